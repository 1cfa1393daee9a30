/// View rendering: image and mask under the view transform, then the screen-space overlays
use cairo::Context;

use super::MaskEngine;
use crate::draw::{Point, render_brush_indicator};
use crate::error::EngineError;
use crate::transform::ViewTransform;

// ============================================================================
// Overlay Layout Constants (not configurable)
// ============================================================================

/// Distance of the loupe from the top-left corner of the view
const MAGNIFIER_MARGIN: f64 = 16.0;
/// Debug overlay text origin
const DEBUG_TEXT_X: f64 = 12.0;
const DEBUG_TEXT_Y: f64 = 12.0;
/// Debug overlay background padding
const DEBUG_BG_PAD: f64 = 6.0;
const DEBUG_FONT: &str = "Monospace 12";

impl MaskEngine {
    /// Draws the current view onto `ctx`, which covers `view_width × view_height`
    /// screen pixels.
    ///
    /// Layers, bottom to top: display image and mask buffer (both under the view
    /// transform), the on-canvas brush indicator, the debug overlay, the
    /// brush-size preview, and the loupe.
    pub fn render_view(
        &mut self,
        ctx: &Context,
        view_width: f64,
        view_height: f64,
    ) -> Result<(), EngineError> {
        let transform = *self.state.transform();
        let scale = transform.scale();

        ctx.save()?;
        ctx.transform(transform.matrix());
        ctx.set_source_surface(&self.display_surface, 0.0, 0.0)?;
        ctx.paint()?;
        ctx.set_source_surface(self.buffer.surface(), 0.0, 0.0)?;
        ctx.paint()?;

        if self.state.indicator_visible() {
            if let Some(touch) = self.state.last_touch() {
                // Indicator follows the brush on screen, so undo the zoom
                let mut style = self.indicator_style(self.state.indicator_size() / scale);
                style.border /= scale;
                render_brush_indicator(ctx, touch.image, style);
            }
        }
        ctx.restore()?;

        if self.config.debug.enabled {
            self.render_debug_overlay(ctx, &transform);
        }

        if self.state.preview_active() {
            let center = Point::new(
                view_width / 2.0,
                view_height - self.config.gesture.preview_margin_bottom,
            );
            render_brush_indicator(ctx, center, self.indicator_style(self.state.indicator_size()));
        }

        if self.state.magnifier_visible() {
            self.magnifier
                .draw_onto(ctx, MAGNIFIER_MARGIN, MAGNIFIER_MARGIN)?;
        }

        self.state.needs_redraw = false;
        Ok(())
    }

    fn debug_lines(&self, transform: &ViewTransform) -> String {
        let mut text = transform.describe();
        if let Some(touch) = self.state.last_touch() {
            let (width, height) = self.image_size();
            let normalized = ViewTransform::normalize(touch.image, width, height);
            text.push_str(&format!(
                "\ntouch=({:.1}, {:.1}) image=({:.1}, {:.1})\nnormalized=({:.3}, {:.3})",
                touch.screen.x,
                touch.screen.y,
                touch.image.x,
                touch.image.y,
                normalized.x,
                normalized.y
            ));
        }
        text
    }

    fn render_debug_overlay(&self, ctx: &Context, transform: &ViewTransform) {
        let layout = pangocairo::functions::create_layout(ctx);
        let font_desc = pango::FontDescription::from_string(DEBUG_FONT);
        layout.set_font_description(Some(&font_desc));
        layout.set_text(&self.debug_lines(transform));

        let (_ink_rect, logical_rect) = layout.extents();
        let scale = pango::SCALE as f64;
        let text_width = logical_rect.width() as f64 / scale;
        let text_height = logical_rect.height() as f64 / scale;

        ctx.set_source_rgba(0.0, 0.0, 0.0, 0.6);
        ctx.rectangle(
            DEBUG_TEXT_X - DEBUG_BG_PAD,
            DEBUG_TEXT_Y - DEBUG_BG_PAD,
            text_width + DEBUG_BG_PAD * 2.0,
            text_height + DEBUG_BG_PAD * 2.0,
        );
        if let Err(e) = ctx.fill() {
            log::warn!("Failed to draw debug overlay background: {}", e);
            return;
        }

        ctx.set_source_rgba(1.0, 1.0, 1.0, 1.0);
        ctx.move_to(DEBUG_TEXT_X, DEBUG_TEXT_Y);
        pangocairo::functions::show_layout(ctx, &layout);
    }
}
