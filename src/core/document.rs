//! Parsing of the upstream XML into a queryable tree.

use roxmltree::Document;
use tracing::debug;

use super::error::RatesError;

/// Parses raw document text into an XML tree borrowing from `text`.
///
/// Only well-formedness is checked here; currency semantics live in
/// [`crate::core::rates`].
pub fn parse_document(text: &str) -> Result<Document<'_>, RatesError> {
    let doc = Document::parse(text)?;
    debug!(
        nodes = doc.descendants().count(),
        root = doc.root_element().tag_name().name(),
        "Parsed rate document"
    );
    Ok(doc)
}
