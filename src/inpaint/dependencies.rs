use std::sync::Arc;

use crate::draw::{BinaryMask, Bitmap};
use crate::inpaint::types::InpaintError;

/// The external inpainting routine.
///
/// Receives the image and a two-level mask of the same size and returns the
/// modified image. Called on a blocking worker thread.
pub trait Inpainter: Send + Sync {
    fn inpaint(&self, image: &Bitmap, mask: &BinaryMask) -> Result<Bitmap, InpaintError>;
}

impl<F> Inpainter for F
where
    F: Fn(&Bitmap, &BinaryMask) -> Result<Bitmap, InpaintError> + Send + Sync,
{
    fn inpaint(&self, image: &Bitmap, mask: &BinaryMask) -> Result<Bitmap, InpaintError> {
        self(image, mask)
    }
}

/// Bundle of collaborators used by the inpaint pipeline. Each can be mocked in tests.
#[derive(Clone)]
pub struct InpaintDependencies {
    pub inpainter: Arc<dyn Inpainter>,
}

impl InpaintDependencies {
    pub fn new(inpainter: impl Inpainter + 'static) -> Self {
        Self {
            inpainter: Arc::new(inpainter),
        }
    }
}
