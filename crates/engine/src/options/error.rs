use studio_util::HttpFetchError;
use thiserror::Error;

/// Why a resolution cycle ended in `Failed`.
///
/// Consumers usually render one generic failure indicator; the variant and
/// message are kept for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The request could not complete: invalid URL, connection failure,
    /// timeout, or a non-2xx status.
    #[error("network error: {0}")]
    Network(String),
    /// The body was not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Decode(String),
    /// The response format could not turn the body into options.
    #[error("response could not be formatted: {0}")]
    Format(String),
}

impl From<HttpFetchError> for ResolveError {
    fn from(error: HttpFetchError) -> Self {
        match error {
            HttpFetchError::Decode(message) => ResolveError::Decode(message),
            other @ (HttpFetchError::Network(_) | HttpFetchError::Status { .. }) => ResolveError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_counts_as_network_failure() {
        let error = ResolveError::from(HttpFetchError::Status {
            status: 502,
            body: "bad gateway".into(),
        });
        assert_eq!(error, ResolveError::Network("HTTP 502: bad gateway".into()));
    }

    #[test]
    fn decode_failures_stay_distinct() {
        let error = ResolveError::from(HttpFetchError::Decode("expected value at line 1".into()));
        assert!(matches!(error, ResolveError::Decode(_)));
    }
}
