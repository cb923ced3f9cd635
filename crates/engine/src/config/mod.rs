//! Studio configuration: backend URL, HTTP policy, and option-backed fields.

mod builtin;
mod global;
mod io;
mod model;

pub use builtin::default_fields;
pub use global::{install, installed};
pub use io::{CONFIG_PATH_ENV, default_config_path, interpolate_config, load_config, load_config_from_path};
pub use model::{ConfigError, DEFAULT_REQUEST_TIMEOUT_SECS, StudioConfig};
