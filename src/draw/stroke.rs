//! Stroke definitions for mask authoring.

use serde::{Deserialize, Serialize};

/// A position in image-pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snaps both coordinates to the nearest integral pixel.
    pub fn rounded(self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// What a stroke does to the mask when composited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeMode {
    /// Marks pixels for inpainting
    Paint,
    /// Removes earlier marks along the path
    Erase,
    /// Reveals the backing image where nothing is drawn yet
    Restore,
    /// Fills the closed polygon traced by the path
    LassoFill,
}

/// Cairo blend rule used to composite a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendRule {
    /// Replace destination with the marker color
    Source,
    /// Clear destination alpha along the path
    Clear,
    /// Fill only where the destination is still transparent
    DestOver,
}

impl BlendRule {
    pub fn operator(self) -> cairo::Operator {
        match self {
            BlendRule::Source => cairo::Operator::Source,
            BlendRule::Clear => cairo::Operator::Clear,
            BlendRule::DestOver => cairo::Operator::DestOver,
        }
    }
}

impl StrokeMode {
    pub fn blend_rule(self) -> BlendRule {
        match self {
            StrokeMode::Paint | StrokeMode::LassoFill => BlendRule::Source,
            StrokeMode::Erase => BlendRule::Clear,
            StrokeMode::Restore => BlendRule::DestOver,
        }
    }

    /// Returns true for modes whose coverage counts towards the exported mask.
    pub fn marks_mask(self) -> bool {
        !matches!(self, StrokeMode::Restore)
    }

    pub fn label(self) -> &'static str {
        match self {
            StrokeMode::Paint => "paint",
            StrokeMode::Erase => "erase",
            StrokeMode::Restore => "restore",
            StrokeMode::LassoFill => "lasso",
        }
    }
}

/// One committed drawing gesture.
///
/// Strokes are value records: once built they are never mutated. The brush
/// width is captured in image pixels at authoring time so later zoom changes
/// do not distort strokes that were already drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    mode: StrokeMode,
    width: f64,
    points: Vec<Point>,
}

impl Stroke {
    /// Builds a stroke. Returns `None` when `points` is empty.
    pub fn new(mode: StrokeMode, width: f64, points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            mode,
            width: width.max(0.0),
            points,
        })
    }

    /// Single-point stroke, rendered as a round dab.
    pub fn dot(mode: StrokeMode, width: f64, at: Point) -> Self {
        Self {
            mode,
            width: width.max(0.0),
            points: vec![at],
        }
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    /// Stroke width in image pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Only lasso fills are closed into polygons.
    pub fn is_closed(&self) -> bool {
        self.mode == StrokeMode::LassoFill
    }

    pub fn is_restore(&self) -> bool {
        self.mode == StrokeMode::Restore
    }

    /// Returns false for strokes that cannot draw anything (e.g. deserialized with no points).
    pub fn is_drawable(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Immutable brush parameters captured from the editor's current settings.
///
/// A new value is built whenever mode, size, or zoom changes, so strokes never
/// share a mutable style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushStyle {
    pub mode: StrokeMode,
    /// Stroke width in image pixels
    pub width: f64,
}

impl BrushStyle {
    pub fn stroke(&self, points: Vec<Point>) -> Option<Stroke> {
        Stroke::new(self.mode, self.width, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_points_are_rejected() {
        assert!(Stroke::new(StrokeMode::Paint, 10.0, Vec::new()).is_none());
    }

    #[test]
    fn only_lasso_is_closed() {
        let p = Point::new(1.0, 1.0);
        assert!(Stroke::dot(StrokeMode::LassoFill, 1.0, p).is_closed());
        assert!(!Stroke::dot(StrokeMode::Paint, 1.0, p).is_closed());
        assert!(!Stroke::dot(StrokeMode::Erase, 1.0, p).is_closed());
    }

    #[test]
    fn restore_does_not_mark_mask() {
        assert!(!StrokeMode::Restore.marks_mask());
        assert!(StrokeMode::Erase.marks_mask());
        assert_eq!(StrokeMode::Restore.blend_rule(), BlendRule::DestOver);
        assert_eq!(StrokeMode::Erase.blend_rule(), BlendRule::Clear);
    }

    #[test]
    fn stroke_json_uses_kebab_case_modes() {
        let stroke = Stroke::dot(StrokeMode::LassoFill, 2.0, Point::new(3.0, 4.0));
        let json = serde_json::to_string(&stroke).unwrap();
        assert!(json.contains("\"lasso-fill\""));
        let back: Stroke = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stroke);
    }

    #[test]
    fn rounded_snaps_to_pixels() {
        assert_eq!(Point::new(10.4, 7.6).rounded(), Point::new(10.0, 8.0));
    }
}
