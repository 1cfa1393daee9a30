//! Cairo-based rendering functions for strokes and the brush indicator.

use super::color::{Color, WHITE};
use super::stroke::{BlendRule, Point, Stroke};

/// Paint parameters shared by every stroke in a compositing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Color used for paint and lasso strokes
    pub color: Color,
}

/// Outline style for an in-progress lasso path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LassoOutline {
    pub color: Color,
    /// Line width in image pixels
    pub width: f64,
    /// Dash on/off length in image pixels
    pub dash: f64,
}

fn trace_polyline(ctx: &cairo::Context, points: &[Point]) {
    let Some(first) = points.first() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    if points.len() == 1 {
        // Degenerate segment so round caps still produce a dab
        ctx.line_to(first.x, first.y);
    }
    for p in &points[1..] {
        ctx.line_to(p.x, p.y);
    }
}

fn prepare_line(ctx: &cairo::Context, width: f64) {
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
}

/// Renders one committed stroke with its mode's blend rule.
///
/// `restore_source` is the pattern revealed by restore strokes; when it is
/// `None` restore strokes draw nothing.
pub fn render_stroke(
    ctx: &cairo::Context,
    stroke: &Stroke,
    marker: MarkerStyle,
    restore_source: Option<&cairo::SurfacePattern>,
) {
    if !stroke.is_drawable() {
        return;
    }

    let rule = stroke.mode().blend_rule();
    let _ = ctx.save();
    ctx.set_operator(rule.operator());

    match rule {
        BlendRule::Source => marker.color.apply(ctx),
        BlendRule::Clear => {}
        BlendRule::DestOver => match restore_source {
            Some(pattern) => {
                if ctx.set_source(pattern).is_err() {
                    let _ = ctx.restore();
                    return;
                }
            }
            None => {
                let _ = ctx.restore();
                return;
            }
        },
    }

    if stroke.is_closed() {
        trace_polyline(ctx, stroke.points());
        ctx.close_path();
        ctx.set_fill_rule(cairo::FillRule::Winding);
        let _ = ctx.fill();
    } else {
        prepare_line(ctx, stroke.width());
        trace_polyline(ctx, stroke.points());
        let _ = ctx.stroke();
    }

    let _ = ctx.restore();
}

/// Renders the in-progress lasso path as a dashed outline.
pub fn render_lasso_outline(ctx: &cairo::Context, points: &[Point], outline: LassoOutline) {
    if points.is_empty() {
        return;
    }
    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Source);
    outline.color.apply(ctx);
    prepare_line(ctx, outline.width);
    if outline.dash > 0.0 {
        ctx.set_dash(&[outline.dash, outline.dash], 0.0);
    }
    trace_polyline(ctx, points);
    let _ = ctx.stroke();
    let _ = ctx.restore();
}

/// Brush-position indicator: a filled disc with a white ring.
///
/// `diameter` and `border` are in the units of the context's current
/// transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorStyle {
    pub diameter: f64,
    pub border: f64,
    pub fill: Color,
}

pub fn render_brush_indicator(ctx: &cairo::Context, center: Point, style: IndicatorStyle) {
    let IndicatorStyle {
        diameter,
        border,
        fill,
    } = style;
    let radius = (diameter / 2.0).max(0.5);
    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Over);

    WHITE.apply(ctx);
    ctx.set_line_width(border);
    ctx.new_sub_path();
    ctx.arc(
        center.x,
        center.y,
        radius + border / 2.0,
        0.0,
        std::f64::consts::PI * 2.0,
    );
    let _ = ctx.stroke();

    fill.apply(ctx);
    ctx.new_sub_path();
    ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0);
    let _ = ctx.fill();

    let _ = ctx.restore();
}

/// Adds a rounded rectangle path to the context.
pub fn rounded_rect_path(ctx: &cairo::Context, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let pi = std::f64::consts::PI;
    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -pi / 2.0, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, pi / 2.0);
    ctx.arc(x + r, y + h - r, r, pi / 2.0, pi);
    ctx.arc(x + r, y + r, r, pi, 3.0 * pi / 2.0);
    ctx.close_path();
}
