//! Configuration file support for maskscribe.
//!
//! Settings are read from `~/.config/maskscribe/config.toml` (or an explicit
//! path passed on the command line). They cover brush widths and colors,
//! gesture timing, magnifier appearance, and developer diagnostics.
//!
//! If no config file exists, defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{BrushConfig, DebugConfig, GestureConfig, MagnifierConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [brush]
/// min_width = 4.0
/// max_width = 40.0
/// default_size = 0.5
/// marker_color = [255, 59, 48, 160]
///
/// [gesture]
/// commit_delay_ms = 50
///
/// [magnifier]
/// width = 240.0
/// height = 240.0
///
/// [debug]
/// enabled = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Brush widths, lasso outline, and colors
    #[serde(default)]
    pub brush: BrushConfig,

    /// Commit delay and preview timing
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Loupe size and frame
    #[serde(default)]
    pub magnifier: MagnifierConfig,

    /// Diagnostics overlay
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged.
    ///
    /// Validated ranges:
    /// - `brush.min_width`: 1.0 - 200.0
    /// - `brush.max_width`: min_width - 400.0
    /// - `brush.default_size`: 0.0 - 1.0
    /// - `gesture.commit_delay_ms`: 0 - 1000
    /// - `magnifier.width` / `height`: 32.0 - 1024.0
    pub fn validate_and_clamp(&mut self) {
        let brush = &mut self.brush;

        if !(1.0..=200.0).contains(&brush.min_width) {
            log::warn!(
                "Invalid min_width {:.1}, clamping to 1.0-200.0 range",
                brush.min_width
            );
            brush.min_width = clamp_or(brush.min_width, 1.0, 200.0, 4.0);
        }

        if !(brush.min_width..=400.0).contains(&brush.max_width) {
            log::warn!(
                "Invalid max_width {:.1}, clamping to {:.1}-400.0 range",
                brush.max_width,
                brush.min_width
            );
            brush.max_width = clamp_or(brush.max_width, brush.min_width, 400.0, brush.min_width);
        }

        if !(0.0..=1.0).contains(&brush.default_size) {
            log::warn!(
                "Invalid default_size {:.2}, clamping to 0.0-1.0 range",
                brush.default_size
            );
            brush.default_size = clamp_or(brush.default_size, 0.0, 1.0, 0.5);
        }

        if !(0.5..=50.0).contains(&brush.lasso_width) {
            log::warn!(
                "Invalid lasso_width {:.1}, clamping to 0.5-50.0 range",
                brush.lasso_width
            );
            brush.lasso_width = clamp_or(brush.lasso_width, 0.5, 50.0, 3.0);
        }

        if !(0.0..=200.0).contains(&brush.lasso_dash) {
            log::warn!(
                "Invalid lasso_dash {:.1}, clamping to 0.0-200.0 range",
                brush.lasso_dash
            );
            brush.lasso_dash = clamp_or(brush.lasso_dash, 0.0, 200.0, 12.0);
        }

        if !(0.0..=20.0).contains(&brush.indicator_border_width) {
            log::warn!(
                "Invalid indicator_border_width {:.1}, clamping to 0.0-20.0 range",
                brush.indicator_border_width
            );
            brush.indicator_border_width = clamp_or(brush.indicator_border_width, 0.0, 20.0, 3.0);
        }

        if brush.marker_color.is_invisible() {
            log::warn!("marker_color is fully transparent; painted marks will not show on screen");
        }

        if self.gesture.commit_delay_ms > 1000 {
            log::warn!(
                "Invalid commit_delay_ms {}, clamping to 0-1000 range",
                self.gesture.commit_delay_ms
            );
            self.gesture.commit_delay_ms = 1000;
        }

        if self.gesture.indicator_preview_ms > 10_000 {
            log::warn!(
                "Invalid indicator_preview_ms {}, clamping to 0-10000 range",
                self.gesture.indicator_preview_ms
            );
            self.gesture.indicator_preview_ms = 10_000;
        }

        let magnifier = &mut self.magnifier;
        for (name, value) in [
            ("width", &mut magnifier.width),
            ("height", &mut magnifier.height),
        ] {
            if !(32.0..=1024.0).contains(value) {
                log::warn!(
                    "Invalid magnifier {} {:.1}, clamping to 32.0-1024.0 range",
                    name,
                    value
                );
                *value = clamp_or(*value, 32.0, 1024.0, 240.0);
            }
        }

        let max_radius = magnifier.width.min(magnifier.height) / 2.0;
        if !(0.0..=max_radius).contains(&magnifier.border_radius) {
            log::warn!(
                "Invalid magnifier border_radius {:.1}, clamping to 0.0-{:.1} range",
                magnifier.border_radius,
                max_radius
            );
            magnifier.border_radius = clamp_or(magnifier.border_radius, 0.0, max_radius, 0.0);
        }

        if !(0.0..=20.0).contains(&magnifier.border_width) {
            log::warn!(
                "Invalid magnifier border_width {:.1}, clamping to 0.0-20.0 range",
                magnifier.border_width
            );
            magnifier.border_width = clamp_or(magnifier.border_width, 0.0, 20.0, 3.0);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("maskscribe");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `path`, falling back to defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses TOML without touching the filesystem. Values are not clamped.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Invalid config TOML")
    }

    /// JSON schema describing the config file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
