//! Upstream document abstraction

use async_trait::async_trait;

use super::error::RatesError;

/// Something that can hand back the raw rate history document.
///
/// Every call performs a fresh retrieval; implementations must not cache.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self) -> Result<String, RatesError>;
}
