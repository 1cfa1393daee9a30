//! Stroke model, Cairo rendering, layered compositing, and mask extraction.
//!
//! This module defines the core drawing types used for mask authoring:
//! - [`Stroke`]: one committed gesture tagged with a [`StrokeMode`]
//! - [`StrokeList`]: ordered container for all strokes in a session
//! - [`MaskBuffer`]: image-sized raster re-derived from the stroke list
//! - [`BinaryMask`]: black/white export for the inpainting hand-off

pub mod bitmap;
pub mod color;
pub mod compositor;
pub mod mask;
pub mod render;
pub mod stroke;
pub mod stroke_list;

// Re-export commonly used types at module level
pub use bitmap::Bitmap;
pub use color::Color;
pub use compositor::{LiveStroke, MaskBuffer, Scene, composite, composite_strokes};
pub use mask::{BinaryMask, extract_binary_mask};
pub use render::{
    IndicatorStyle, LassoOutline, MarkerStyle, render_brush_indicator, render_stroke,
    rounded_rect_path,
};
pub use stroke::{BlendRule, BrushStyle, Point, Stroke, StrokeMode};
pub use stroke_list::{ClearScope, StrokeList};
