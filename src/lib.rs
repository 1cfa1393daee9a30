//! Mask-authoring engine for touch-driven object removal.
//!
//! A host feeds pointer events and view transforms into a [`MaskEngine`]; the
//! engine records paint, erase, restore, and lasso strokes in image space,
//! keeps a composited mask buffer and magnifier up to date, and exports a
//! binary mask for an external inpainting routine via [`inpaint`].

pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod inpaint;
pub mod input;
pub mod magnifier;
pub mod script;
pub mod transform;
pub mod util;

pub use config::Config;
pub use engine::MaskEngine;
pub use error::EngineError;
pub use input::{EditorEvent, PaintMode, PointerDisposition, PointerEvent, PointerPhase};
