//! Query façade over the fetch, parse and re-base pipeline.
//!
//! Each call fetches and parses the upstream document afresh; nothing is
//! shared between calls besides the source itself.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::document::parse_document;
use crate::core::rates::{extract_rates, latest_rates, list_currencies};
use crate::core::{DocumentSource, ExchangeRate, RatesError};

pub struct ExchangeRateService {
    source: Arc<dyn DocumentSource>,
}

impl ExchangeRateService {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    /// Every currency code the ECB publishes, EUR included.
    #[instrument(skip(self))]
    pub async fn currencies(&self) -> Result<Vec<String>, RatesError> {
        let text = self.source.fetch_document().await?;
        let doc = parse_document(&text)?;
        list_currencies(&doc)
    }

    /// Rates re-based on `currency_code`, bounded inclusively by `start` and `end`.
    #[instrument(skip(self))]
    pub async fn rates(
        &self,
        currency_code: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<ExchangeRate>, RatesError> {
        let base = validate_currency_code(currency_code)?;
        let text = self.source.fetch_document().await?;
        let doc = parse_document(&text)?;
        extract_rates(&doc, base, start, end)
    }

    /// Rates re-based on `currency_code` for the single day `date`.
    pub async fn rates_on(
        &self,
        currency_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<ExchangeRate>, RatesError> {
        self.rates(currency_code, Some(date), Some(date)).await
    }

    /// The most recent snapshot re-based on `currency_code`.
    ///
    /// Pulls the full history and keeps the rows on its maximum date.
    pub async fn latest_rates(&self, currency_code: &str) -> Result<Vec<ExchangeRate>, RatesError> {
        let rates = self.rates(currency_code, None, None).await?;
        let latest = latest_rates(rates)?;
        debug!(
            date = ?latest.first().map(|r| r.date),
            rows = latest.len(),
            "Selected latest snapshot"
        );
        Ok(latest)
    }
}

/// Rejects blank codes; surrounding whitespace is ignored.
pub fn validate_currency_code(currency_code: &str) -> Result<&str, RatesError> {
    let code = currency_code.trim();
    if code.is_empty() {
        return Err(RatesError::Validation(
            "Currency code is required".to_string(),
        ));
    }
    Ok(code)
}
