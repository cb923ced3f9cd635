//! Environment interpolation for configuration values.
//!
//! Configuration strings may reference environment variables with
//! `${env:NAME}`. Placeholders are resolved once, when the configuration is
//! loaded, so backend hosts never need to be embedded in field definitions.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static ENV_PLACEHOLDER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\$\{env:([\w+_-]*)}").ok());

/// Errors that can occur during interpolation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Missing environment variable: {name}")]
    MissingEnvVar { name: String },

    #[error("Empty placeholder in '{value}'")]
    EmptyPlaceholder { value: String },
}

/// Replace every `${env:NAME}` placeholder in `value` with the variable's value.
///
/// Strings without placeholders are returned unchanged.
pub fn interpolate_env(value: &str) -> Result<String, InterpolationError> {
    let Some(env_regex) = ENV_PLACEHOLDER.as_ref() else {
        return Ok(value.to_string());
    };

    let mut resolved = Vec::new();
    for captures in env_regex.captures_iter(value) {
        let var_name = captures[1].to_string();
        if var_name.is_empty() {
            return Err(InterpolationError::EmptyPlaceholder { value: value.to_string() });
        }
        let env_value = std::env::var(&var_name).map_err(|_| InterpolationError::MissingEnvVar { name: var_name.clone() })?;
        debug!(variable = %var_name, "interpolated env var");
        resolved.push((captures[0].to_string(), env_value));
    }

    let mut result = value.to_string();
    for (placeholder, env_value) in resolved {
        result = result.replace(&placeholder, &env_value);
    }
    Ok(result)
}
