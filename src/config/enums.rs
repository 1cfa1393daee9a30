//! Configuration enum types.

use crate::draw::{Color, color::MARKER};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a named color, RGB, or RGBA values.
///
/// # Examples
/// ```toml
/// # Named color
/// lasso_color = "green"
///
/// # Custom RGB color (0-255 per component)
/// lasso_color = [76, 175, 80]
///
/// # Custom RGBA color for a translucent marker
/// marker_color = [255, 59, 48, 160]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: marker, red, green, blue, yellow, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
    /// RGBA color as [red, green, blue, alpha] where each component is 0-255
    Rgba([u8; 4]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Unknown color names fall back to the default marker color with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using marker color", name);
                MARKER
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgba8(*r, *g, *b, 255),
            ColorSpec::Rgba([r, g, b, a]) => Color::from_rgba8(*r, *g, *b, *a),
        }
    }

    /// Returns true when the spec resolves to a color with zero alpha.
    pub fn is_invisible(&self) -> bool {
        self.to_color().a <= 0.0
    }
}
