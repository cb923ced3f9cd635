//! Data models for the studio configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use studio_api::ClientSettings;
use studio_types::{FieldCatalog, FieldDefinition, OptionSourceSpec};
use studio_util::InterpolationError;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::builtin::default_fields;
use crate::options::{OptionSource, ResponseFormat};

/// Request timeout used when the configuration does not set one.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading or using the studio configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    #[error("invalid backend_url '{url}': {message}")]
    InvalidBackendUrl { url: String, message: String },

    #[error("invalid URL '{url}' for field '{field}': {message}")]
    InvalidFieldUrl { field: String, url: String, message: String },

    #[error("unknown option field '{0}'")]
    UnknownField(String),

    #[error("studio configuration is already installed")]
    AlreadyInstalled,
}

/// Top-level studio configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    /// Base URL joined with relative field URLs (for example `/api/models`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Allow plain `http` option URLs for non-localhost hosts.
    #[serde(default)]
    pub allow_insecure_http: bool,

    /// Option-backed fields keyed by schema path.
    #[serde(default = "default_fields")]
    pub fields: FieldCatalog,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            allow_insecure_http: false,
            fields: default_fields(),
        }
    }
}

impl StudioConfig {
    /// HTTP client settings derived from this configuration.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            allow_insecure_http: self.allow_insecure_http,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Build the option source for a configured field.
    pub fn option_source(&self, field: &str) -> Result<OptionSource, ConfigError> {
        let definition = self.field(field).ok_or_else(|| ConfigError::UnknownField(field.to_string()))?;
        self.source_for(field, &definition.source)
    }

    /// Turn a declarative source into a resolvable one.
    ///
    /// Absolute URLs are used as-is. Relative URLs are joined onto
    /// `backend_url`; without a backend they resolve to an unconfigured
    /// source, which yields an empty option list.
    pub fn source_for(&self, field: &str, spec: &OptionSourceSpec) -> Result<OptionSource, ConfigError> {
        let format = ResponseFormat::from(spec.format.clone());
        let raw = spec.url.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(OptionSource::new(String::new(), format));
        }

        if Url::parse(raw).is_ok() {
            return Ok(OptionSource::new(raw, format));
        }

        let Some(backend) = self.backend_url()? else {
            debug!(field, path = raw, "relative option URL without backend_url; field left unconfigured");
            return Ok(OptionSource::new(String::new(), format));
        };
        let joined = backend.join(raw).map_err(|error| ConfigError::InvalidFieldUrl {
            field: field.to_string(),
            url: raw.to_string(),
            message: error.to_string(),
        })?;
        Ok(OptionSource::new(joined.to_string(), format))
    }

    /// Parsed backend URL, if one is configured.
    pub fn backend_url(&self) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.backend_url.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };
        Url::parse(raw).map(Some).map_err(|error| ConfigError::InvalidBackendUrl {
            url: raw.to_string(),
            message: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_types::{FieldMapping, FormatSpec};

    const HERO: &str = "equipmentGuide.heroEquipment";

    #[test]
    fn default_catalog_is_unconfigured_without_backend() {
        let config = StudioConfig::default();
        let source = config.option_source(HERO).unwrap();
        assert!(source.is_unconfigured());
        assert_eq!(
            source.format,
            ResponseFormat::FieldMap(FieldMapping::new("model_name", "model_slug").with_image("model_image"))
        );
    }

    #[test]
    fn relative_urls_join_backend() {
        let config = StudioConfig {
            backend_url: Some("https://backend.example.com".into()),
            ..StudioConfig::default()
        };
        let source = config.option_source(HERO).unwrap();
        assert_eq!(source.url, "https://backend.example.com/api/models");
    }

    #[test]
    fn absolute_urls_ignore_backend() {
        let config = StudioConfig {
            backend_url: Some("https://backend.example.com".into()),
            ..StudioConfig::default()
        };
        let spec = OptionSourceSpec {
            url: Some("https://api.example.com/models".into()),
            format: FormatSpec::Identity,
        };
        let source = config.source_for("custom", &spec).unwrap();
        assert_eq!(source.url, "https://api.example.com/models");
        assert_eq!(source.format, ResponseFormat::Identity);
    }

    #[test]
    fn unknown_fields_and_bad_backends_are_errors() {
        let config = StudioConfig {
            backend_url: Some("not a url".into()),
            ..StudioConfig::default()
        };
        assert!(matches!(config.option_source("nope"), Err(ConfigError::UnknownField(_))));
        assert!(matches!(config.option_source(HERO), Err(ConfigError::InvalidBackendUrl { .. })));
    }

    #[test]
    fn client_settings_follow_config() {
        let config = StudioConfig {
            request_timeout_secs: 5,
            allow_insecure_http: true,
            ..StudioConfig::default()
        };
        let settings = config.client_settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert!(settings.allow_insecure_http);
    }
}
