mod core;
mod pointer;

pub use core::{EditorState, GestureState, TouchPoint};
