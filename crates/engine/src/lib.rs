//! # Studio Engine
//!
//! The studio engine turns option-backed field definitions into selectable
//! option lists. A field names a remote JSON endpoint and a response shape;
//! the engine fetches the endpoint once per configuration, normalizes the
//! body into `{label, value, image?}` options, and reports progress through a
//! small state machine that a selection control can render.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use studio_engine::{HttpOptionFetcher, RemoteOptionResolver, StudioConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = StudioConfig::default();
//! let source = config.option_source("equipmentGuide.heroEquipment")?;
//! let fetcher = HttpOptionFetcher::from_settings(config.client_settings())?;
//!
//! let mut resolver = RemoteOptionResolver::new(Arc::new(fetcher));
//! resolver.resolve(source);
//! let state = resolver.settled().await;
//! println!("{state:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`options`**: response formats, fetchers, and the resolver state machine
//! - **`config`**: studio configuration loading, the built-in field catalog,
//!   and process-wide installation

pub mod config;
pub mod options;

pub use config::{ConfigError, StudioConfig, default_config_path, load_config, load_config_from_path};
pub use options::{
    HttpOptionFetcher, OptionFetcher, OptionSource, RemoteOptionResolver, ResolutionState, ResolveError, ResponseFormat,
    option_for_value, resolve_options, select,
};
