//! Remote option resolution facade.
//!
//! Modules:
//! - `error`: Failure taxonomy shared by every resolution step
//! - `format`: Typed transforms from raw JSON to options
//! - `source`: The `(url, format)` pair a field resolves against
//! - `fetch`: Fetcher trait and default HTTP fetcher
//! - `resolver`: State machine with a generation race-guard
//! - `selection`: Mapping a chosen option to a field patch

mod error;
mod fetch;
mod format;
mod resolver;
mod selection;
mod source;

pub use error::ResolveError;
pub use fetch::{HttpOptionFetcher, OptionFetcher};
pub use format::{FormatFn, ResponseFormat};
pub use resolver::{RemoteOptionResolver, ResolutionState, resolve_options};
pub use selection::{option_for_value, select};
pub use source::OptionSource;
