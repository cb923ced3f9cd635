//! # Text Processing Utilities
//!
//! Redaction of credential-looking values before they reach logs, and
//! truncation of response bodies for one-line error summaries.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const REDACTED: &str = "[REDACTED]";

/// Query parameter names whose values never appear in logs.
const SENSITIVE_QUERY_KEYS: &[&str] = &["token", "key", "api_key", "apikey", "secret", "signature", "sig", "password"];

/// Redacts values that look like secrets in a string.
///
/// # Example
/// ```rust
/// use studio_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("API_KEY=abc123 TOKEN=xyz789"), "API_KEY=[REDACTED] TOKEN=[REDACTED]");
/// assert_eq!(redact_sensitive("Authorization: Bearer secret123"), "Authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REDACTED}")
            })
            .to_string();
    }
    redacted
}

/// Render a URL for logging with credentials and sensitive query values removed.
pub fn redact_url(url: &Url) -> String {
    let mut display = url.clone();
    if !display.username().is_empty() {
        let _ = display.set_username("");
    }
    if display.password().is_some() {
        let _ = display.set_password(None);
    }
    if display.query().is_some() {
        let pairs: Vec<(String, String)> = display
            .query_pairs()
            .map(|(key, value)| {
                let sensitive = SENSITIVE_QUERY_KEYS.iter().any(|candidate| key.eq_ignore_ascii_case(candidate));
                let value = if sensitive { REDACTED.to_string() } else { value.into_owned() };
                (key.into_owned(), value)
            })
            .collect();
        display.query_pairs_mut().clear().extend_pairs(pairs);
    }
    display.to_string()
}

/// Trim `text` and cut it to at most `max_len` characters, ending in `...`
/// when something was dropped.
pub fn truncate_for_summary(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    // Reserve space for the trailing ellipsis.
    let target_len = max_len.saturating_sub(3);
    let truncated: String = trimmed.chars().take(target_len).collect();
    format!("{}...", truncated.trim_end())
}

fn redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?i)(authorization:\s+)([^\s]+(?:\s+[^\s]+)*)",
            r"(?i)((?:^|\b)Bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
            r"(?i)(\b[A-Z0-9_]*(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s&]+)",
            r"(?i)(\b(?:DATABASE_URL)=)([^\s]+)",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    });

    &REDACT_PATTERNS
}
