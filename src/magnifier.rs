//! Loupe that shows a zoomed excerpt of the image and mask under the finger.

use cairo::{Context, Format, ImageSurface};

use crate::config::MagnifierConfig;
use crate::draw::{
    Bitmap, Color, IndicatorStyle, Point, render_brush_indicator, rounded_rect_path,
};
use crate::error::EngineError;
use crate::util::Rect;

/// Fixed-size loupe buffer.
///
/// The sampled region is `loupe size / view scale` image pixels, so the
/// excerpt always covers the same on-screen area whatever the zoom level.
pub struct Magnifier {
    surface: ImageSurface,
    width: i32,
    height: i32,
    border_width: f64,
    border_radius: f64,
    background: Color,
    last_source: Option<Rect>,
}

impl Magnifier {
    pub fn new(config: &MagnifierConfig) -> Result<Self, EngineError> {
        let width = config.width.round() as i32;
        let height = config.height.round() as i32;
        if width <= 0 || height <= 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        Ok(Self {
            surface,
            width,
            height,
            border_width: config.border_width,
            border_radius: config.border_radius,
            background: config.background.to_color(),
            last_source: None,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Image-pixel region sampled for a touch at `touch` and view scale `scale`.
    pub fn source_rect(&self, touch: Point, scale: f64) -> Rect {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Rect::centered_on(
            touch,
            self.width as f64 / scale,
            self.height as f64 / scale,
        )
    }

    /// Region used by the last `update`, if any.
    pub fn last_source(&self) -> Option<Rect> {
        self.last_source
    }

    /// Re-renders the loupe for a touch at `touch` (image pixels).
    ///
    /// Draws the background, the backing image, and the mask buffer scaled
    /// into the loupe, then the brush indicator at the centre. The indicator
    /// is sized in screen pixels.
    pub fn update(
        &mut self,
        touch: Point,
        scale: f64,
        indicator: IndicatorStyle,
        base: &ImageSurface,
        mask: &ImageSurface,
    ) -> Result<Rect, EngineError> {
        let source = self.source_rect(touch, scale);
        let (w, h) = (self.width as f64, self.height as f64);

        let ctx = Context::new(&self.surface)?;
        ctx.set_operator(cairo::Operator::Source);
        self.background.apply(&ctx);
        ctx.paint()?;
        ctx.set_operator(cairo::Operator::Over);

        ctx.save()?;
        ctx.scale(w / source.width as f64, h / source.height as f64);
        ctx.translate(-source.x as f64, -source.y as f64);
        for layer in [base, mask] {
            ctx.set_source_surface(layer, 0.0, 0.0)?;
            ctx.paint()?;
        }
        ctx.restore()?;

        render_brush_indicator(&ctx, Point::new(w / 2.0, h / 2.0), indicator);
        drop(ctx);

        self.surface.flush();
        self.last_source = Some(source);
        Ok(source)
    }

    /// Draws the loupe with its rounded frame at `(x, y)` on `ctx`.
    pub fn draw_onto(&self, ctx: &Context, x: f64, y: f64) -> Result<(), EngineError> {
        let (w, h) = (self.width as f64, self.height as f64);
        ctx.save()?;
        rounded_rect_path(ctx, x, y, w, h, self.border_radius);
        ctx.clip_preserve();
        ctx.set_source_surface(&self.surface, x, y)?;
        ctx.paint()?;

        // Half the ring is clipped away, leaving `border_width` visible
        crate::draw::color::WHITE.apply(ctx);
        ctx.set_line_width(self.border_width * 2.0);
        ctx.stroke()?;
        ctx.restore()?;
        Ok(())
    }

    /// Copies the loupe contents out as an owned bitmap.
    pub fn snapshot(&mut self) -> Result<Bitmap, EngineError> {
        Bitmap::from_surface(&mut self.surface)
    }
}
