//! Theme styling for the picker.
//!
//! Colors come from semantic roles so widgets never hard-code a palette.
//! Only the Nord palette ships today.

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::NordTheme;
pub use roles::Theme;
