//! Layered compositing of the stroke list into the mask buffer.
//!
//! The buffer is always rebuilt from scratch: clear to transparent, then replay
//! every stroke in order with its blend rule. Whenever a run of consecutive
//! restore strokes ends, the following strokes are drawn into a fresh group
//! that is flattened onto the buffer later, so paint or erase strokes never end
//! up underneath a restore stroke's destination-over reveal.

use cairo::{Context, Extend, Format, ImageSurface, SurfacePattern};

use super::bitmap::Bitmap;
use super::render::{LassoOutline, MarkerStyle, render_lasso_outline, render_stroke};
use super::stroke::{Point, Stroke};
use crate::error::EngineError;

/// The stroke currently being drawn, composited on top of the committed list.
#[derive(Clone, Copy, Debug)]
pub enum LiveStroke<'a> {
    /// Freehand paint, erase, or restore stroke in progress
    Stroke(&'a Stroke),
    /// Lasso path in progress, previewed as a dashed outline
    Lasso(&'a [Point], LassoOutline),
}

impl LiveStroke<'_> {
    fn is_restore(&self) -> bool {
        matches!(self, LiveStroke::Stroke(stroke) if stroke.is_restore())
    }
}

/// Everything needed for one compositing pass.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub strokes: &'a [Stroke],
    pub live: Option<LiveStroke<'a>>,
    pub marker: MarkerStyle,
    /// Backing image revealed by restore strokes
    pub restore: Option<&'a ImageSurface>,
}

impl<'a> Scene<'a> {
    pub fn new(strokes: &'a [Stroke], marker: MarkerStyle) -> Self {
        Self {
            strokes,
            live: None,
            marker,
            restore: None,
        }
    }
}

/// Replays `scene` onto `ctx`, clearing it first.
pub fn composite(ctx: &Context, scene: &Scene<'_>) -> Result<(), EngineError> {
    let restore_pattern = scene.restore.map(|surface| {
        let pattern = SurfacePattern::create(surface);
        pattern.set_extend(Extend::Pad);
        pattern
    });

    ctx.save()?;
    ctx.set_operator(cairo::Operator::Clear);
    ctx.paint()?;
    ctx.set_operator(cairo::Operator::Over);

    let total = scene.strokes.len() + usize::from(scene.live.is_some());
    let is_restore_at = |index: usize| -> Option<bool> {
        if index < scene.strokes.len() {
            Some(scene.strokes[index].is_restore())
        } else if index == scene.strokes.len() {
            scene.live.map(|live| live.is_restore())
        } else {
            None
        }
    };

    let mut layer_open = false;
    let mut need_new_layer = false;

    for index in 0..total {
        if need_new_layer {
            if layer_open {
                flatten_layer(ctx)?;
            }
            ctx.push_group();
            layer_open = true;
            need_new_layer = false;
        }

        if let Some(stroke) = scene.strokes.get(index) {
            render_stroke(ctx, stroke, scene.marker, restore_pattern.as_ref());
        } else if let Some(live) = scene.live {
            match live {
                LiveStroke::Stroke(stroke) => {
                    render_stroke(ctx, stroke, scene.marker, restore_pattern.as_ref())
                }
                LiveStroke::Lasso(points, outline) => render_lasso_outline(ctx, points, outline),
            }
        }

        let boundary = is_restore_at(index) == Some(true) && is_restore_at(index + 1) == Some(false);
        if boundary {
            need_new_layer = true;
        }
    }

    if layer_open {
        flatten_layer(ctx)?;
    }

    ctx.restore()?;
    Ok(())
}

fn flatten_layer(ctx: &Context) -> Result<(), EngineError> {
    ctx.pop_group_to_source()?;
    ctx.set_operator(cairo::Operator::Over);
    ctx.paint()?;
    Ok(())
}

/// Image-sized raster holding the latest composite.
pub struct MaskBuffer {
    surface: ImageSurface,
}

impl MaskBuffer {
    /// Creates a transparent buffer with the source image's dimensions.
    pub fn new(width: i32, height: i32) -> Result<Self, EngineError> {
        if width <= 0 || height <= 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            surface: ImageSurface::create(Format::ARgb32, width, height)?,
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Rebuilds the whole buffer from `scene`.
    pub fn recomposite(&mut self, scene: &Scene<'_>) -> Result<(), EngineError> {
        let ctx = Context::new(&self.surface)?;
        composite(&ctx, scene)?;
        drop(ctx);
        self.surface.flush();
        Ok(())
    }

    /// The composited surface, for drawing on screen or into the magnifier.
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Copies the current composite out of the buffer.
    pub fn to_bitmap(&mut self) -> Result<Bitmap, EngineError> {
        Bitmap::from_surface(&mut self.surface)
    }

    /// Returns true when any pixel of the composite is non-transparent.
    pub fn has_marks(&mut self) -> Result<bool, EngineError> {
        Ok(!self.to_bitmap()?.is_fully_transparent())
    }
}

/// Composites `strokes` onto a fresh buffer of the given size.
///
/// Pure function of its inputs; safe to run on a worker thread with an
/// immutable stroke snapshot.
pub fn composite_strokes(
    strokes: &[Stroke],
    width: i32,
    height: i32,
    marker: MarkerStyle,
    backing: Option<&Bitmap>,
) -> Result<Bitmap, EngineError> {
    let backing_surface = backing.map(Bitmap::to_surface).transpose()?;
    let mut buffer = MaskBuffer::new(width, height)?;
    let scene = Scene {
        strokes,
        live: None,
        marker,
        restore: backing_surface.as_ref(),
    };
    buffer.recomposite(&scene)?;
    buffer.to_bitmap()
}
