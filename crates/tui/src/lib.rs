//! # Studio TUI
//!
//! Terminal picker for option-backed fields. The picker resolves the field's
//! option source in the background, shows a spinner while the request is in
//! flight, and lets the user filter, choose, or clear a value.
//!
//! ## Keys
//!
//! - Type to filter by label or value
//! - `↑`/`↓` to move, `Enter` to commit the highlighted option
//! - `Ctrl+U` or `Delete` to unset the field
//! - `Esc` to close without changes

mod ui;

pub use ui::picker::{PickerAction, PickerComponent, PickerState};
pub use ui::runtime::{PickerOutcome, run_picker};
