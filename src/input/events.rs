//! Pointer events consumed by the editor and notifications it publishes.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::draw::Point;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform aborted the gesture; handled like `Up`
    Cancel,
}

/// One raw pointer sample in screen space.
///
/// `time` drives the commit timer, so hosts replaying recorded input can
/// supply synthetic timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: u32,
    /// Screen-space position in pixels
    pub position: Point,
    pub phase: PointerPhase,
    /// True for the first finger of a gesture
    pub primary: bool,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(id: u32, phase: PointerPhase, x: f64, y: f64, primary: bool, time: Instant) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            phase,
            primary,
            time,
        }
    }
}

/// Notification published by the editor for external collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    /// A gesture finished or was pre-empted by multi-touch. Pull the
    /// current mask to react.
    GestureEnded,
    /// A single-touch sample was consumed at this screen position.
    Touch { screen: Point },
}

/// What the editor did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDisposition {
    /// Used for drawing
    Consumed,
    /// Multi-touch: hand the event to the pan/zoom handler
    Forward,
    /// Stale pointer id, or input is disabled
    Ignored,
}
