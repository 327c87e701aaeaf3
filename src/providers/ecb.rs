use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::EcbProviderConfig;
use crate::core::{DocumentSource, RatesError};

const USER_AGENT: &str = concat!("ecb-rates/", env!("CARGO_PKG_VERSION"));

// EcbProvider fetches the full reference rate history, once per call
pub struct EcbProvider {
    url: String,
    client: reqwest::Client,
}

impl EcbProvider {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RatesError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RatesError::Upstream(format!("Failed to build HTTP client: {e}")))?;

        Ok(EcbProvider {
            url: url.to_string(),
            client,
        })
    }

    pub fn from_config(config: &EcbProviderConfig) -> Result<Self, RatesError> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DocumentSource for EcbProvider {
    #[instrument(name = "EcbDocumentFetch", skip(self), fields(url = %self.url))]
    async fn fetch_document(&self) -> Result<String, RatesError> {
        debug!("Requesting rate history from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RatesError::Upstream(format!("Request error: {} URL: {}", e, self.url)))?;

        if !response.status().is_success() {
            return Err(RatesError::Upstream(format!(
                "HTTP error: {} URL: {}",
                response.status(),
                self.url
            )));
        }

        let text = response.text().await.map_err(|e| {
            RatesError::Upstream(format!("Failed to read response body from {}: {}", self.url, e))
        })?;

        debug!(bytes = text.len(), "Received rate history");
        Ok(text)
    }
}
