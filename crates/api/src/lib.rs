//! HTTP client for remote option sources.
//!
//! This crate provides a lightweight client used to download option lists for
//! option-backed fields. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults (JSON `Accept`, a
//!   studio `User-Agent`, a request timeout)
//! - Validating option URLs before any request is issued
//!
//! Option endpoints are public catalogs, so no credentials are attached.
//!
//! # Example
//!
//! ```ignore
//! use studio_api::{ClientSettings, OptionsClient};
//!
//! let client = OptionsClient::new(ClientSettings::default())?;
//! let url = client.validate_url("https://api.example.com/models")?;
//! let response = client.get(url).send().await?;
//! println!("status: {}", response.status());
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Url, header};
use tracing::debug;

/// Hostnames allowed to use plain `http` regardless of configuration.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Default request timeout applied to option fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for building an [`OptionsClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Upper bound for connecting, sending, and reading the whole body.
    pub timeout: Duration,
    /// Permit `http://` URLs for hosts other than localhost.
    pub allow_insecure_http: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            allow_insecure_http: false,
        }
    }
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for option endpoints.
pub struct OptionsClient {
    pub http: Client,
    pub user_agent: String,
    allow_insecure_http: bool,
}

impl OptionsClient {
    /// Build a client with JSON defaults and the configured timeout.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(settings.timeout)
            .build()
            .context("build http client")?;

        Ok(Self {
            http,
            user_agent: format!("studio/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            allow_insecure_http: settings.allow_insecure_http,
        })
    }

    /// Validate `raw` against this client's URL policy.
    pub fn validate_url(&self, raw: &str) -> Result<Url> {
        validate_option_url(raw, self.allow_insecure_http)
    }

    /// Build a GET request for an already validated URL.
    pub fn get(&self, url: Url) -> RequestBuilder {
        debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "building request");

        self.http.get(url).header(header::USER_AGENT, &self.user_agent)
    }
}

/// Validate that a URL is acceptable as an option source.
///
/// Rules:
/// - must parse as an absolute URL with a host
/// - `localhost`, `127.0.0.1`, `[::1]`: `http` or `https`
/// - otherwise: `https`, unless `allow_insecure_http` is set
pub fn validate_option_url(raw: &str, allow_insecure_http: bool) -> Result<Url> {
    let parsed = Url::parse(raw.trim()).map_err(|e| anyhow!("invalid option URL '{}': {}", raw, e))?;

    let host_name = parsed
        .host_str()
        .ok_or_else(|| anyhow!("option URL '{}' must include a host", raw))?;

    match parsed.scheme() {
        "https" => Ok(parsed),
        "http" => {
            let is_local = LOCALHOST_DOMAINS
                .iter()
                .any(|&allowed| host_name.eq_ignore_ascii_case(allowed));
            if is_local || allow_insecure_http {
                Ok(parsed)
            } else {
                Err(anyhow!(
                    "option URL must use https for non-localhost hosts; got 'http://{}'",
                    host_name
                ))
            }
        }
        other => Err(anyhow!("unsupported option URL scheme '{}://'", other)),
    }
}
