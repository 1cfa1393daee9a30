//! Utility functions for colors and pixel-grid geometry.
//!
//! This module provides:
//! - Name-to-color mapping for the configuration file
//! - Integer rectangle helper used by the magnifier to pick its sample region

use crate::draw::{Color, Point, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "marker", "red", "green", "blue", "yellow", "white", "black", "transparent"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "marker" => Some(MARKER),
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Axis-aligned rectangle on the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Rectangle of `width × height` whose centre is `center`, snapped to whole pixels.
    ///
    /// Sizes below one pixel are raised to one so the result is always valid.
    pub fn centered_on(center: Point, width: f64, height: f64) -> Self {
        let width = width.round().max(1.0) as i32;
        let height = height.round().max(1.0) as i32;
        let cx = center.x.round() as i32;
        let cy = center.y.round() as i32;
        Self {
            x: cx - width / 2,
            y: cy - height / 2,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
