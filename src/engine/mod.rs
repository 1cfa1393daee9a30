//! Editing session: input state, backing images, mask buffer, and loupe.
//!
//! [`MaskEngine`] is what a host drives. It forwards pointer events to the
//! gesture state machine, recomposites the mask buffer whenever the stroke
//! list or the live stroke changes, keeps the magnifier in sync with the
//! touch point, and exposes mask extraction and the inpaint hand-off.

mod render;
#[cfg(test)]
mod tests;

use std::time::Instant;

use cairo::{ImageSurface, Matrix};

use crate::config::Config;
use crate::draw::{
    BinaryMask, Bitmap, ClearScope, IndicatorStyle, LiveStroke, MarkerStyle, MaskBuffer, Scene,
    Stroke, extract_binary_mask,
};
use crate::error::EngineError;
use crate::inpaint::{InpaintRequest, InpaintResult};
use crate::input::{EditorEvent, EditorState, PaintMode, PointerDisposition, PointerEvent};
use crate::magnifier::Magnifier;

/// One mask-authoring session over a single image.
pub struct MaskEngine {
    /// Gesture state machine and stroke list
    pub state: EditorState,
    config: Config,
    marker: MarkerStyle,
    display: Bitmap,
    display_surface: ImageSurface,
    restore_surface: ImageSurface,
    buffer: MaskBuffer,
    magnifier: Magnifier,
}

impl MaskEngine {
    /// Starts a session over `image`.
    ///
    /// The image sets the mask dimensions and is also the content revealed by
    /// restore strokes until [`set_restore_image`](Self::set_restore_image)
    /// replaces it.
    pub fn new(image: Bitmap, config: Config) -> Result<Self, EngineError> {
        let (width, height) = image.dimensions();
        let buffer = MaskBuffer::new(width, height)?;
        let magnifier = Magnifier::new(&config.magnifier)?;
        let display_surface = image.to_surface()?;
        let restore_surface = image.to_surface()?;
        let marker = MarkerStyle {
            color: config.brush.marker_color.to_color(),
        };

        log::info!("Mask session started on {}x{} image", width, height);

        let mut engine = Self {
            state: EditorState::with_defaults(width, height, &config),
            config,
            marker,
            display: image,
            display_surface,
            restore_surface,
            buffer,
            magnifier,
        };
        engine.refresh()?;
        Ok(engine)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn image_size(&self) -> (i32, i32) {
        self.display.dimensions()
    }

    /// Image currently shown under the mask (the last inpaint result, if any).
    pub fn display_image(&self) -> &Bitmap {
        &self.display
    }

    /// Feeds one pointer event through the gesture state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<PointerDisposition, EngineError> {
        let disposition = self.state.handle_pointer(event);
        self.refresh()?;
        Ok(disposition)
    }

    /// Fires timers due at `now`. Returns true when the commit timer fired.
    pub fn advance(&mut self, now: Instant) -> Result<bool, EngineError> {
        let fired = self.state.advance(now);
        self.refresh()?;
        Ok(fired)
    }

    pub fn set_transform(&mut self, matrix: Matrix, is_init: bool) -> Result<(), EngineError> {
        self.state.set_transform(matrix, is_init)
    }

    pub fn set_mode(&mut self, mode: PaintMode) {
        self.state.set_mode(mode);
    }

    /// Sets the brush size (0.0 - 1.0), optionally showing the size preview
    /// from `preview_at`.
    pub fn set_brush_size(&mut self, size: f64, preview_at: Option<Instant>) {
        self.state.set_brush_size(size, preview_at);
    }

    pub fn show_indicator(&mut self, show: bool) {
        self.state.set_show_indicator(show);
    }

    pub fn set_touch_disabled(&mut self, disabled: bool) {
        self.state.set_touch_disabled(disabled);
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.state.strokes.as_slice()
    }

    /// Copy of the committed strokes, for undo snapshots.
    pub fn get_strokes(&self) -> Vec<Stroke> {
        self.state.strokes.snapshot()
    }

    /// Replaces the committed strokes and recomposites.
    pub fn set_strokes(&mut self, strokes: Vec<Stroke>) -> Result<(), EngineError> {
        self.state.set_strokes(strokes);
        self.refresh()
    }

    /// Clears strokes in `scope`. Returns whether there were any strokes before.
    pub fn clear_drawing(&mut self, scope: ClearScope) -> Result<bool, EngineError> {
        let had_strokes = self.state.clear_drawing(scope);
        self.refresh()?;
        Ok(had_strokes)
    }

    /// Notifications published since the last call.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.state.take_events()
    }

    /// Builds the black/white mask for the committed strokes.
    pub fn extract_binary_mask(&self) -> Result<BinaryMask, EngineError> {
        let (width, height) = self.image_size();
        extract_binary_mask(self.strokes(), width, height, self.marker)
    }

    /// True when the composited buffer has any visible pixel.
    pub fn has_marks(&mut self) -> Result<bool, EngineError> {
        self.buffer.has_marks()
    }

    /// Current composite of the mask buffer.
    pub fn composite_bitmap(&mut self) -> Result<Bitmap, EngineError> {
        self.buffer.to_bitmap()
    }

    /// Loupe contents as of the last touch.
    pub fn magnifier_snapshot(&mut self) -> Result<Bitmap, EngineError> {
        self.magnifier.snapshot()
    }

    /// Replaces the image revealed by restore strokes.
    pub fn set_restore_image(&mut self, image: &Bitmap) -> Result<(), EngineError> {
        self.check_size(image)?;
        self.restore_surface = image.to_surface()?;
        self.state.needs_composite = true;
        self.refresh()
    }

    /// Replaces the image shown under the mask.
    pub fn set_display_image(&mut self, image: Bitmap) -> Result<(), EngineError> {
        self.check_size(&image)?;
        self.display_surface = image.to_surface()?;
        self.display = image;
        self.state.needs_redraw = true;
        Ok(())
    }

    /// Immutable snapshot for the inpaint worker.
    pub fn inpaint_request(&self) -> InpaintRequest {
        InpaintRequest {
            strokes: self.get_strokes(),
            image: self.display.clone(),
            marker: self.marker,
        }
    }

    /// Installs a finished inpaint: the result becomes the display image, the
    /// strokes the mask was built from are removed, and the editor returns to
    /// paint mode. Restore strokes and strokes committed after the request stay.
    pub fn apply_inpaint_result(&mut self, result: InpaintResult) -> Result<(), EngineError> {
        self.set_display_image(result.image)?;
        self.state.remove_consumed(&result.strokes);
        self.state.set_mode(PaintMode::Paint);
        self.refresh()
    }

    fn check_size(&self, image: &Bitmap) -> Result<(), EngineError> {
        let expected = self.image_size();
        let actual = image.dimensions();
        if expected != actual {
            return Err(EngineError::SizeMismatch { expected, actual });
        }
        Ok(())
    }

    fn indicator_style(&self, diameter: f64) -> IndicatorStyle {
        IndicatorStyle {
            diameter,
            border: self.config.brush.indicator_border_width,
            fill: self.marker.color,
        }
    }

    /// Recomposites and updates the loupe if the state asks for it.
    fn refresh(&mut self) -> Result<(), EngineError> {
        if self.state.needs_composite {
            let started = Instant::now();
            let pending = self.state.pending_stroke();
            let live = match (&pending, self.state.lasso_path()) {
                (Some(stroke), _) => Some(LiveStroke::Stroke(stroke)),
                (None, Some(path)) => Some(LiveStroke::Lasso(path, self.state.lasso_outline())),
                (None, None) => None,
            };
            let scene = Scene {
                strokes: self.state.strokes.as_slice(),
                live,
                marker: self.marker,
                restore: Some(&self.restore_surface),
            };
            self.buffer.recomposite(&scene)?;
            self.state.needs_composite = false;
            self.state.needs_redraw = true;

            if self.config.debug.log_composite_timing {
                log::debug!(
                    "Composited {} stroke(s) in {:?}",
                    self.state.strokes.len(),
                    started.elapsed()
                );
            }
        }

        if self.state.magnifier_visible() {
            if let Some(touch) = self.state.last_touch() {
                let indicator = self.indicator_style(self.state.indicator_size());
                self.magnifier.update(
                    touch.image,
                    self.state.transform().scale(),
                    indicator,
                    &self.display_surface,
                    self.buffer.surface(),
                )?;
            }
        }
        Ok(())
    }
}
