//! Utility helpers shared by the studio engine, TUI, and CLI.

pub mod http_exec;
pub mod interpolation;
mod path_processing;
pub mod text_processing;

pub use http_exec::{HttpFetchError, fetch_json};
pub use interpolation::{InterpolationError, interpolate_env};
pub use path_processing::expand_tilde;
pub use text_processing::{redact_sensitive, redact_url, truncate_for_summary};
