//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input events (keyboard, drag/touch)
//! - Time/ticks for hosts without a display refresh callback
//!
//! Storage lives in `persistence`.

pub mod input;
pub mod time;

pub use input::InputState;
pub use time::FixedStepTimer;
