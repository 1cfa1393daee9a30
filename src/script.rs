//! Stroke files and recorded gesture scripts for headless runs.
//!
//! A stroke file is the committed stroke list wrapped in a small versioned
//! envelope. A script is a JSON list of steps replayed through the gesture
//! state machine against a synthetic clock, so commit-timer behaviour is
//! reproducible:
//!
//! ```json
//! [
//!   { "mode": "erase" },
//!   { "brush": { "size": 0.25 } },
//!   { "transform": { "scale": 2.0, "tx": -100.0, "ty": 0.0, "init": true } },
//!   { "pointer": { "id": 1, "phase": "down", "x": 120.0, "y": 80.0 } },
//!   { "wait_ms": 60 },
//!   { "pointer": { "id": 1, "phase": "up", "x": 180.0, "y": 80.0 } }
//! ]
//! ```

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use cairo::Matrix;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::draw::Stroke;
use crate::engine::MaskEngine;
use crate::input::{PaintMode, PointerDisposition, PointerEvent, PointerPhase};

const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StrokeFile {
    version: u32,
    #[serde(default)]
    strokes: Vec<Stroke>,
}

/// Reads a stroke file written by [`save_strokes`].
pub fn load_strokes(path: &Path) -> Result<Vec<Stroke>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read stroke file {}", path.display()))?;
    let file: StrokeFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse stroke file {}", path.display()))?;
    if file.version > CURRENT_VERSION {
        bail!(
            "stroke file {} has unsupported version {} (expected <= {})",
            path.display(),
            file.version,
            CURRENT_VERSION
        );
    }
    debug!("Loaded {} stroke(s) from {}", file.strokes.len(), path.display());
    Ok(file.strokes)
}

pub fn save_strokes(path: &Path, strokes: &[Stroke]) -> Result<()> {
    let file = StrokeFile {
        version: CURRENT_VERSION,
        strokes: strokes.to_vec(),
    };
    let json = serde_json::to_vec_pretty(&file).context("failed to serialise strokes")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write stroke file {}", path.display()))?;
    info!("Saved {} stroke(s) to {}", strokes.len(), path.display());
    Ok(())
}

fn default_primary() -> bool {
    true
}

/// One step of a recorded gesture script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Mode(PaintMode),
    Brush {
        size: f64,
        #[serde(default)]
        preview: bool,
    },
    /// Uniform zoom plus translation pushed by the pan/zoom controller
    Transform {
        scale: f64,
        #[serde(default)]
        tx: f64,
        #[serde(default)]
        ty: f64,
        #[serde(default)]
        init: bool,
    },
    Pointer {
        id: u32,
        phase: PointerPhase,
        x: f64,
        y: f64,
        #[serde(default = "default_primary")]
        primary: bool,
    },
    /// Advances the synthetic clock, firing any timers that come due
    WaitMs(u64),
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(source).context("failed to parse gesture script")
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse_script(&raw).with_context(|| format!("in script {}", path.display()))
}

/// Counts of how the engine disposed of replayed pointer events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub consumed: usize,
    pub forwarded: usize,
    pub ignored: usize,
    pub gestures: usize,
}

/// Replays `steps` into `engine`, starting the synthetic clock at `start`.
pub fn replay(engine: &mut MaskEngine, steps: &[ScriptStep], start: Instant) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    let mut now = start;

    for (index, step) in steps.iter().enumerate() {
        match *step {
            ScriptStep::Mode(mode) => engine.set_mode(mode),
            ScriptStep::Brush { size, preview } => {
                engine.set_brush_size(size, preview.then_some(now));
            }
            ScriptStep::Transform { scale, tx, ty, init } => {
                engine
                    .set_transform(Matrix::new(scale, 0.0, 0.0, scale, tx, ty), init)
                    .with_context(|| format!("step {index}: invalid transform"))?;
            }
            ScriptStep::Pointer {
                id,
                phase,
                x,
                y,
                primary,
            } => {
                let event = PointerEvent::new(id, phase, x, y, primary, now);
                match engine.handle_pointer(event)? {
                    PointerDisposition::Consumed => summary.consumed += 1,
                    PointerDisposition::Forward => summary.forwarded += 1,
                    PointerDisposition::Ignored => summary.ignored += 1,
                }
            }
            ScriptStep::WaitMs(ms) => {
                now += Duration::from_millis(ms);
                engine.advance(now)?;
            }
        }
    }

    summary.gestures = engine
        .take_events()
        .iter()
        .filter(|event| matches!(event, crate::input::EditorEvent::GestureEnded))
        .count();
    debug!("Replayed {} step(s): {:?}", steps.len(), summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draw::color::BLUE;
    use crate::draw::{Bitmap, Point, StrokeMode};
    use tempfile::TempDir;

    const SWIPE: &str = r#"[
        { "mode": "paint" },
        { "pointer": { "id": 1, "phase": "down", "x": 10.0, "y": 50.0 } },
        { "wait_ms": 60 },
        { "pointer": { "id": 1, "phase": "move", "x": 90.0, "y": 50.0 } },
        { "pointer": { "id": 1, "phase": "up", "x": 90.0, "y": 50.0 } }
    ]"#;

    fn engine() -> MaskEngine {
        MaskEngine::new(Bitmap::filled(100, 100, BLUE).unwrap(), Config::default()).unwrap()
    }

    #[test]
    fn parses_all_step_kinds() {
        let steps = parse_script(
            r#"[
                { "mode": "lasso" },
                { "brush": { "size": 0.25, "preview": true } },
                { "transform": { "scale": 2.0, "init": true } },
                { "pointer": { "id": 2, "phase": "cancel", "x": 1.0, "y": 2.0, "primary": false } },
                { "wait_ms": 5 }
            ]"#,
        )
        .unwrap();

        assert_eq!(steps[0], ScriptStep::Mode(PaintMode::Lasso));
        assert_eq!(
            steps[1],
            ScriptStep::Brush {
                size: 0.25,
                preview: true
            }
        );
        assert_eq!(
            steps[2],
            ScriptStep::Transform {
                scale: 2.0,
                tx: 0.0,
                ty: 0.0,
                init: true
            }
        );
        assert!(matches!(
            steps[3],
            ScriptStep::Pointer {
                id: 2,
                phase: PointerPhase::Cancel,
                primary: false,
                ..
            }
        ));
        assert_eq!(steps[4], ScriptStep::WaitMs(5));
    }

    #[test]
    fn rejects_unknown_step() {
        assert!(parse_script(r#"[{ "jump": 3 }]"#).is_err());
    }

    #[test]
    fn replay_draws_committed_stroke() {
        let mut engine = engine();
        let steps = parse_script(SWIPE).unwrap();
        let summary = replay(&mut engine, &steps, Instant::now()).unwrap();

        assert_eq!(summary.consumed, 3);
        assert_eq!(summary.gestures, 1);
        assert_eq!(engine.strokes().len(), 1);
        assert!(engine.extract_binary_mask().unwrap().is_marked(50, 50));
    }

    #[test]
    fn replay_counts_forwarded_pinch() {
        let mut engine = engine();
        let steps = parse_script(
            r#"[
                { "pointer": { "id": 1, "phase": "down", "x": 10.0, "y": 10.0 } },
                { "pointer": { "id": 2, "phase": "down", "x": 60.0, "y": 60.0, "primary": false } },
                { "pointer": { "id": 2, "phase": "move", "x": 70.0, "y": 70.0, "primary": false } },
                { "pointer": { "id": 1, "phase": "up", "x": 10.0, "y": 10.0 } },
                { "pointer": { "id": 2, "phase": "up", "x": 70.0, "y": 70.0, "primary": false } }
            ]"#,
        )
        .unwrap();
        let summary = replay(&mut engine, &steps, Instant::now()).unwrap();

        assert_eq!(summary.consumed, 1);
        assert_eq!(summary.forwarded, 4);
        assert!(engine.strokes().is_empty());
    }

    #[test]
    fn replay_rejects_degenerate_transform() {
        let mut engine = engine();
        let steps = vec![ScriptStep::Transform {
            scale: 0.0,
            tx: 0.0,
            ty: 0.0,
            init: false,
        }];
        let err = replay(&mut engine, &steps, Instant::now()).unwrap_err();
        assert!(err.to_string().contains("step 0"));
    }

    #[test]
    fn stroke_file_survives_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("strokes.json");
        let strokes = vec![
            Stroke::dot(StrokeMode::Paint, 12.0, Point::new(5.0, 5.0)),
            Stroke::dot(StrokeMode::Restore, 8.0, Point::new(7.0, 9.0)),
        ];

        save_strokes(&path, &strokes).unwrap();
        assert_eq!(load_strokes(&path).unwrap(), strokes);
    }

    #[test]
    fn stroke_file_from_newer_version_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("strokes.json");
        std::fs::write(&path, r#"{ "version": 99, "strokes": [] }"#).unwrap();

        let err = load_strokes(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported version"));
    }
}
