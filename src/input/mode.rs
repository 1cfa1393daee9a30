//! Paint mode selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::draw::StrokeMode;

/// Paint mode chosen by the user.
///
/// The active mode determines which kind of stroke a gesture creates. The mode
/// is captured when a gesture starts, so switching mid-gesture only affects the
/// next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaintMode {
    /// Freehand marking (default)
    #[default]
    Paint,
    /// Freehand removal of marks
    Erase,
    /// Freehand reveal of the backing image
    Restore,
    /// Closed-region marking; the path becomes a filled polygon on release
    #[serde(alias = "lasso-fill")]
    Lasso,
}

impl PaintMode {
    pub fn stroke_mode(self) -> StrokeMode {
        match self {
            PaintMode::Paint => StrokeMode::Paint,
            PaintMode::Erase => StrokeMode::Erase,
            PaintMode::Restore => StrokeMode::Restore,
            PaintMode::Lasso => StrokeMode::LassoFill,
        }
    }

    pub fn is_lasso(self) -> bool {
        self == PaintMode::Lasso
    }
}

impl fmt::Display for PaintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stroke_mode().label())
    }
}

impl FromStr for PaintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paint" => Ok(PaintMode::Paint),
            "erase" => Ok(PaintMode::Erase),
            "restore" => Ok(PaintMode::Restore),
            "lasso" | "lasso-fill" => Ok(PaintMode::Lasso),
            other => Err(format!(
                "unknown mode '{other}' (expected paint, erase, restore, or lasso)"
            )),
        }
    }
}
