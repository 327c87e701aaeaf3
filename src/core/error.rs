//! Error taxonomy for the rate pipeline.

use thiserror::Error;

/// Every failure that can abort a rate query.
///
/// None of these are recovered locally; they propagate to the caller and
/// are rendered at the HTTP or CLI boundary.
#[derive(Debug, Error)]
pub enum RatesError {
    /// The upstream document could not be fetched.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The upstream body is not well-formed XML.
    #[error("malformed rate document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    /// The document parsed but the expected attribute pattern is absent.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// A date or rate value is present but unparsable.
    #[error("invalid format: {0}")]
    Format(String),

    /// The requested base currency is missing from a snapshot.
    #[error("Currency {0} not found")]
    CurrencyNotFound(String),

    /// The caller omitted or mangled a required parameter.
    #[error("{0}")]
    Validation(String),

    /// The upstream document carries no dated snapshots at all.
    #[error("no rate history available")]
    EmptyHistory,
}

impl RatesError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RatesError::Validation(_))
    }

    /// Whether the failure originates from the upstream feed or its content.
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            RatesError::Upstream(_)
                | RatesError::MalformedDocument(_)
                | RatesError::Extraction(_)
                | RatesError::Format(_)
        )
    }
}
