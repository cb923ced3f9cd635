//! Option picker wiring.

mod picker_component;
mod state;

pub use picker_component::{PickerAction, PickerComponent};
pub use state::PickerState;
