//! Pointer input and the gesture state machine.
//!
//! This module turns raw screen-space pointer events into strokes. It tracks
//! the paint mode, brush size, and view transform, applies the commit delay and
//! multi-touch cancellation rules, and publishes notifications for the host.

pub mod events;
pub mod mode;
pub mod state;

// Re-export commonly used types at module level
pub use events::{EditorEvent, PointerDisposition, PointerEvent, PointerPhase};
pub use mode::PaintMode;
pub use state::{EditorState, GestureState, TouchPoint};
