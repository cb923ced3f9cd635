use async_trait::async_trait;
use serde_json::Value;
use studio_api::{ClientSettings, OptionsClient};
use studio_util::{fetch_json, redact_url};
use tracing::debug;

use super::error::ResolveError;

/// Downloads the raw JSON body behind an option URL.
///
/// The resolver issues exactly one call per resolution cycle and never
/// retries, so implementations should not retry either.
#[async_trait]
pub trait OptionFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, ResolveError>;
}

/// Default fetcher: validates the URL, then performs a single GET.
#[derive(Debug, Clone)]
pub struct HttpOptionFetcher {
    client: OptionsClient,
}

impl HttpOptionFetcher {
    pub fn new(client: OptionsClient) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: ClientSettings) -> anyhow::Result<Self> {
        Ok(Self::new(OptionsClient::new(settings)?))
    }
}

#[async_trait]
impl OptionFetcher for HttpOptionFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, ResolveError> {
        let url = self
            .client
            .validate_url(url)
            .map_err(|error| ResolveError::Network(error.to_string()))?;
        debug!(url = %redact_url(&url), "option fetch started");
        Ok(fetch_json(&self.client, &url).await?)
    }
}
