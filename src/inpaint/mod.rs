//! Hand-off of the binary mask to an external inpainting routine.
//!
//! The editor snapshots its strokes and display image into an
//! [`InpaintRequest`]; the [`InpaintManager`] extracts the mask on a blocking
//! worker, rejects empty masks, calls the [`Inpainter`], and publishes the
//! status and result for the editor to pick up.

mod dependencies;
mod manager;
mod pipeline;
mod types;

pub use dependencies::{InpaintDependencies, Inpainter};
pub use manager::InpaintManager;
pub use types::{InpaintError, InpaintOutcome, InpaintRequest, InpaintResult, InpaintStatus};
