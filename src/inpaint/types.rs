//! Data types for the inpainting hand-off.

use std::fmt;

use thiserror::Error;

use crate::draw::{BinaryMask, Bitmap, MarkerStyle, Stroke};
use crate::error::EngineError;

/// Immutable snapshot of an editing session handed to the worker.
#[derive(Clone)]
pub struct InpaintRequest {
    /// Committed strokes at the time of the request
    pub strokes: Vec<Stroke>,
    /// Image to inpaint (the current display image)
    pub image: Bitmap,
    pub marker: MarkerStyle,
}

impl fmt::Debug for InpaintRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InpaintRequest")
            .field("strokes", &self.strokes.len())
            .field("image", &self.image.dimensions())
            .finish()
    }
}

/// Result of a successful inpaint.
#[derive(Debug, Clone)]
pub struct InpaintResult {
    /// Inpainted image, same size as the request image
    pub image: Bitmap,
    /// Mask that was handed to the inpainter
    pub mask: BinaryMask,
    /// Strokes the mask was built from; only these are consumed on apply
    pub strokes: Vec<Stroke>,
}

/// Outcome of an inpaint request.
#[derive(Debug, Clone)]
pub enum InpaintOutcome {
    Success(InpaintResult),
    Failed(String),
}

/// Errors that can occur while preparing or running an inpaint.
#[derive(Debug, Error)]
pub enum InpaintError {
    #[error("Nothing is marked for inpainting")]
    EmptyMask,

    #[error("Mask extraction failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Inpainting backend failed: {0}")]
    Backend(String),

    #[error("Inpainter returned a {actual:?} image for a {expected:?} request")]
    SizeMismatch {
        expected: (i32, i32),
        actual: (i32, i32),
    },

    #[error("Inpaint task failed: {0}")]
    TaskFailed(String),

    #[error("Inpaint manager not running")]
    ManagerNotRunning,
}

/// Status of the current inpaint operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InpaintStatus {
    /// No request in flight.
    Idle,
    /// Extracting the mask and checking that something is marked.
    Checking,
    /// The inpainter is running.
    Running,
    /// The last request finished; the result is waiting to be taken.
    Succeeded,
    /// The last request failed.
    Failed(String),
}
