//! HTTP execution helpers shared across the TUI and engine.
//!
//! Option sources are plain JSON endpoints: one GET, a status check, and a
//! parse of the full body. Nothing here retries.

use serde_json::Value;
use studio_api::OptionsClient;
use thiserror::Error;
use url::Url;

use crate::text_processing::{redact_sensitive, truncate_for_summary};

/// Longest response excerpt kept in a status error.
const BODY_EXCERPT_LEN: usize = 160;

/// Failure modes of [`fetch_json`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpFetchError {
    /// The request could not be sent or the body could not be read
    /// (connection refused, DNS, TLS, timeout).
    #[error("Network error: {0}. Hint: check connection/proxy and the configured URL")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The body was not valid JSON.
    #[error("Invalid JSON: {0}")]
    Decode(String),
}

/// Fetch `url` with a GET request and parse the whole body as JSON.
///
/// # Errors
/// - [`HttpFetchError::Network`] when sending or reading fails, including timeouts.
/// - [`HttpFetchError::Status`] for any non-2xx status, with a redacted, truncated body excerpt.
/// - [`HttpFetchError::Decode`] when the body is not JSON.
pub async fn fetch_json(client: &OptionsClient, url: &Url) -> Result<Value, HttpFetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| HttpFetchError::Network(e.to_string()))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| HttpFetchError::Network(e.to_string()))?;

    if !status.is_success() {
        let excerpt = truncate_for_summary(&redact_sensitive(&text), BODY_EXCERPT_LEN);
        return Err(HttpFetchError::Status {
            status: status.as_u16(),
            body: excerpt,
        });
    }

    serde_json::from_str::<Value>(&text).map_err(|e| HttpFetchError::Decode(e.to_string()))
}
