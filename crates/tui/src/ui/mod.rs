//! UI layer: the option picker, its runtime, and theme styling.

pub mod picker;
pub mod runtime;
pub mod theme;
