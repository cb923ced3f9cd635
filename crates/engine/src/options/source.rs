use super::format::ResponseFormat;

/// Where a field's options come from and how the response is shaped.
///
/// A resolver treats two sources as the same configuration when both the URL
/// and the format are equal; only a different pair starts a new fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSource {
    /// Absolute URL of the option endpoint. Empty means unconfigured.
    pub url: String,
    pub format: ResponseFormat,
}

impl OptionSource {
    pub fn new(url: impl Into<String>, format: ResponseFormat) -> Self {
        Self { url: url.into(), format }
    }

    /// A source with no URL; resolves to an empty list without any request.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn is_unconfigured(&self) -> bool {
        self.url.trim().is_empty()
    }
}
