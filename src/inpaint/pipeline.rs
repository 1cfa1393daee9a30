use std::sync::Arc;

use tokio::task;

use crate::draw::{BinaryMask, extract_binary_mask};
use crate::inpaint::{
    dependencies::Inpainter,
    types::{InpaintError, InpaintRequest, InpaintResult},
};

/// Extracts the binary mask for `request` on a blocking worker.
///
/// Fails with [`InpaintError::EmptyMask`] when nothing is marked.
pub(crate) async fn prepare_mask(
    request: InpaintRequest,
) -> Result<(InpaintRequest, BinaryMask), InpaintError> {
    let (request, mask) = task::spawn_blocking(move || {
        let (width, height) = request.image.dimensions();
        let mask = extract_binary_mask(&request.strokes, width, height, request.marker)?;
        Ok::<_, InpaintError>((request, mask))
    })
    .await
    .map_err(|e| InpaintError::TaskFailed(format!("Mask task failed: {}", e)))??;

    if mask.is_empty() {
        return Err(InpaintError::EmptyMask);
    }
    log::debug!("Mask ready: {} marked pixel(s)", mask.marked_count());
    Ok((request, mask))
}

/// Runs the external inpainter and checks the result size.
pub(crate) async fn run_inpainter(
    inpainter: Arc<dyn Inpainter>,
    request: InpaintRequest,
    mask: BinaryMask,
) -> Result<InpaintResult, InpaintError> {
    let expected = request.image.dimensions();
    log::info!(
        "Starting inpaint on {}x{} image",
        expected.0,
        expected.1
    );

    let InpaintRequest { strokes, image, .. } = request;
    let (image, mask) = task::spawn_blocking(move || {
        inpainter
            .inpaint(&image, &mask)
            .map(|inpainted| (inpainted, mask))
    })
    .await
    .map_err(|e| InpaintError::TaskFailed(format!("Inpaint task failed: {}", e)))??;

    let actual = image.dimensions();
    if actual != expected {
        return Err(InpaintError::SizeMismatch { expected, actual });
    }
    Ok(InpaintResult {
        image,
        mask,
        strokes,
    })
}
