//! Binary mask extraction for the inpainting hand-off.

use std::io::Write;

use super::bitmap::Bitmap;
use super::compositor::composite_strokes;
use super::render::MarkerStyle;
use super::stroke::Stroke;
use crate::error::EngineError;

const WHITE_PX: u32 = 0xFFFF_FFFF;
const BLACK_PX: u32 = 0xFF00_0000;

/// Two-level mask: every pixel is either marked (white) or unmarked (black).
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: i32,
    height: i32,
    marked: Vec<bool>,
}

impl std::fmt::Debug for BinaryMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("marked", &self.marked_count())
            .finish()
    }
}

impl BinaryMask {
    /// Thresholds the alpha channel: alpha 0 is black, anything else white.
    pub fn from_alpha(bitmap: &Bitmap) -> Self {
        Self {
            width: bitmap.width(),
            height: bitmap.height(),
            marked: bitmap.alphas().map(|a| a > 0).collect(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Whether (x, y) is marked for inpainting. Out-of-bounds reads as unmarked.
    pub fn is_marked(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.marked[(y * self.width + x) as usize]
    }

    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }

    /// True when nothing is marked (all black).
    pub fn is_empty(&self) -> bool {
        !self.marked.iter().any(|m| *m)
    }

    /// One byte per pixel, row-major: 255 for marked, 0 for unmarked.
    pub fn to_luma(&self) -> Vec<u8> {
        self.marked.iter().map(|m| if *m { 255 } else { 0 }).collect()
    }

    /// Opaque black/white bitmap for consumers that expect color images.
    pub fn to_bitmap(&self) -> Result<Bitmap, EngineError> {
        Bitmap::from_argb_pixels(
            self.width,
            self.height,
            self.marked
                .iter()
                .map(|m| if *m { WHITE_PX } else { BLACK_PX }),
        )
    }

    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), EngineError> {
        self.to_bitmap()?.write_png(writer)
    }
}

/// Builds the binary mask for a stroke list.
///
/// Restore strokes are left out: only paint and lasso coverage, net of
/// erasure, counts as marked.
pub fn extract_binary_mask(
    strokes: &[Stroke],
    width: i32,
    height: i32,
    marker: MarkerStyle,
) -> Result<BinaryMask, EngineError> {
    let marking: Vec<Stroke> = strokes
        .iter()
        .filter(|stroke| stroke.mode().marks_mask())
        .cloned()
        .collect();
    let composite = composite_strokes(&marking, width, height, marker, None)?;
    let mask = BinaryMask::from_alpha(&composite);
    log::debug!(
        "Extracted {}x{} mask from {} stroke(s): {} marked pixel(s)",
        width,
        height,
        marking.len(),
        mask.marked_count()
    );
    Ok(mask)
}
