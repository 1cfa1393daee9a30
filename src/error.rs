//! Error types for the mask engine.

use thiserror::Error;

/// Errors that can occur while compositing, converting, or exporting buffers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data is still borrowed: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG I/O error: {0}")]
    Png(#[from] cairo::IoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stroke serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transform is not invertible")]
    NonInvertibleTransform,

    #[error("Invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Bitmap size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (i32, i32),
        actual: (i32, i32),
    },
}
