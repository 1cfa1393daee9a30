//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Brush settings.
///
/// The brush size chosen by the user (0.0 - 1.0) maps linearly onto
/// `min_width ..= max_width` screen pixels.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BrushConfig {
    /// Stroke width in screen pixels at brush size 0.0 (valid range: 1.0 - 200.0)
    #[serde(default = "default_min_width")]
    pub min_width: f64,

    /// Stroke width in screen pixels at brush size 1.0 (valid range: min_width - 400.0)
    #[serde(default = "default_max_width")]
    pub max_width: f64,

    /// Brush size used at session start and for the lasso indicator (0.0 - 1.0)
    #[serde(default = "default_brush_size")]
    pub default_size: f64,

    /// Width of the in-progress lasso outline in screen pixels
    #[serde(default = "default_lasso_width")]
    pub lasso_width: f64,

    /// Dash on/off length of the lasso outline in screen pixels (0 = solid)
    #[serde(default = "default_lasso_dash")]
    pub lasso_dash: f64,

    /// White ring drawn around the brush indicator, in screen pixels
    #[serde(default = "default_indicator_border_width")]
    pub indicator_border_width: f64,

    /// Color used for paint strokes, lasso fills, and the indicator
    #[serde(default = "default_marker_color")]
    pub marker_color: ColorSpec,

    /// Color of the in-progress lasso outline
    #[serde(default = "default_lasso_color")]
    pub lasso_color: ColorSpec,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            max_width: default_max_width(),
            default_size: default_brush_size(),
            lasso_width: default_lasso_width(),
            lasso_dash: default_lasso_dash(),
            indicator_border_width: default_indicator_border_width(),
            marker_color: default_marker_color(),
            lasso_color: default_lasso_color(),
        }
    }
}

impl BrushConfig {
    /// Maps a 0.0 - 1.0 brush size to a stroke width in screen pixels.
    pub fn width_for_size(&self, size: f64) -> f64 {
        size.clamp(0.0, 1.0) * (self.max_width - self.min_width) + self.min_width
    }
}

/// Gesture timing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GestureConfig {
    /// Delay between pointer-down and committing the stroke, in milliseconds
    /// (valid range: 0 - 1000). A second finger landing inside this window
    /// cancels the stroke.
    #[serde(default = "default_commit_delay_ms")]
    pub commit_delay_ms: u64,

    /// How long the brush-size preview stays on screen after a size change (ms)
    #[serde(default = "default_indicator_preview_ms")]
    pub indicator_preview_ms: u64,

    /// Distance above the bottom edge of the view for the brush-size preview
    #[serde(default = "default_preview_margin_bottom")]
    pub preview_margin_bottom: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: default_commit_delay_ms(),
            indicator_preview_ms: default_indicator_preview_ms(),
            preview_margin_bottom: default_preview_margin_bottom(),
        }
    }
}

/// Magnifier (loupe) appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MagnifierConfig {
    /// Loupe width in pixels (valid range: 32.0 - 1024.0)
    #[serde(default = "default_magnifier_size")]
    pub width: f64,

    /// Loupe height in pixels (valid range: 32.0 - 1024.0)
    #[serde(default = "default_magnifier_size")]
    pub height: f64,

    /// Border ring width
    #[serde(default = "default_magnifier_border_width")]
    pub border_width: f64,

    /// Corner radius of the loupe frame
    #[serde(default = "default_magnifier_border_radius")]
    pub border_radius: f64,

    /// Background shown where the sampled region falls outside the image
    #[serde(default = "default_magnifier_background")]
    pub background: ColorSpec,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            width: default_magnifier_size(),
            height: default_magnifier_size(),
            border_width: default_magnifier_border_width(),
            border_radius: default_magnifier_border_radius(),
            background: default_magnifier_background(),
        }
    }
}

/// Developer diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DebugConfig {
    /// Draw transform and touch coordinates over the view
    #[serde(default)]
    pub enabled: bool,

    /// Log how long each compositing pass takes
    #[serde(default)]
    pub log_composite_timing: bool,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_min_width() -> f64 {
    4.0
}

fn default_max_width() -> f64 {
    40.0
}

fn default_brush_size() -> f64 {
    0.5
}

fn default_lasso_width() -> f64 {
    3.0
}

fn default_lasso_dash() -> f64 {
    12.0
}

fn default_indicator_border_width() -> f64 {
    3.0
}

fn default_marker_color() -> ColorSpec {
    ColorSpec::Name("marker".to_string())
}

fn default_lasso_color() -> ColorSpec {
    ColorSpec::Name("green".to_string())
}

fn default_commit_delay_ms() -> u64 {
    50
}

fn default_indicator_preview_ms() -> u64 {
    500
}

fn default_preview_margin_bottom() -> f64 {
    96.0
}

fn default_magnifier_size() -> f64 {
    240.0
}

fn default_magnifier_border_width() -> f64 {
    3.0
}

fn default_magnifier_border_radius() -> f64 {
    16.0
}

fn default_magnifier_background() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}
