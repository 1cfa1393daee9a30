use std::fs::File;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use maskscribe::draw::color::BLUE;
use maskscribe::draw::{Bitmap, Point, Stroke, StrokeMode};
use predicates::prelude::*;
use tempfile::TempDir;

fn maskscribe_cmd() -> Command {
    Command::cargo_bin("maskscribe").expect("binary exists")
}

fn write_image(dir: &Path) -> PathBuf {
    let path = dir.join("photo.png");
    let image = Bitmap::filled(80, 60, BLUE).unwrap();
    image.write_png(&mut File::create(&path).unwrap()).unwrap();
    path
}

fn read_png(path: &Path) -> Bitmap {
    Bitmap::read_png(&mut File::open(path).unwrap()).unwrap()
}

#[test]
fn help_prints_usage() {
    maskscribe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Stroke-based mask authoring for photo inpainting",
        ));
}

#[test]
fn strokes_or_script_is_required() {
    let temp = TempDir::new().unwrap();
    let image = write_image(temp.path());

    maskscribe_cmd()
        .arg("--image")
        .arg(&image)
        .arg("--mask")
        .arg(temp.path().join("mask.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn missing_image_reports_path() {
    let temp = TempDir::new().unwrap();
    let strokes = temp.path().join("strokes.json");
    std::fs::write(&strokes, r#"{ "version": 1, "strokes": [] }"#).unwrap();

    maskscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--image")
        .arg(temp.path().join("nope.png"))
        .arg("--strokes")
        .arg(&strokes)
        .arg("--mask")
        .arg(temp.path().join("mask.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.png"));
}

#[test]
fn stroke_file_produces_mask_and_composite() {
    let temp = TempDir::new().unwrap();
    let image = write_image(temp.path());
    let strokes = temp.path().join("strokes.json");
    maskscribe::script::save_strokes(
        &strokes,
        &[
            Stroke::dot(StrokeMode::Paint, 10.0, Point::new(20.0, 20.0)),
            Stroke::dot(StrokeMode::Restore, 10.0, Point::new(60.0, 40.0)),
        ],
    )
    .unwrap();
    let mask = temp.path().join("mask.png");
    let composite = temp.path().join("composite.png");

    maskscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--image")
        .arg(&image)
        .arg("--strokes")
        .arg(&strokes)
        .arg("--mask")
        .arg(&mask)
        .arg("--composite")
        .arg(&composite)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 stroke(s)"));

    let mask = read_png(&mask);
    assert_eq!(mask.dimensions(), (80, 60));
    assert_eq!(mask.pixel(20, 20), Some(0xFFFF_FFFF));
    assert_eq!(mask.pixel(60, 40), Some(0xFF00_0000));

    let composite = read_png(&composite);
    assert_eq!(composite.pixel(60, 40), Some(0xFF00_00FF));
    assert_eq!(composite.pixel(0, 59), Some(0));
}

#[test]
fn script_replay_saves_strokes() {
    let temp = TempDir::new().unwrap();
    let image = write_image(temp.path());
    let script = temp.path().join("gesture.json");
    std::fs::write(
        &script,
        r#"[
            { "mode": "erase" },
            { "mode": "paint" },
            { "pointer": { "id": 1, "phase": "down", "x": 10.0, "y": 30.0 } },
            { "wait_ms": 60 },
            { "pointer": { "id": 1, "phase": "move", "x": 70.0, "y": 30.0 } },
            { "pointer": { "id": 1, "phase": "up", "x": 70.0, "y": 30.0 } }
        ]"#,
    )
    .unwrap();
    let saved = temp.path().join("saved.json");
    let mask = temp.path().join("mask.png");

    maskscribe_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--image")
        .arg(&image)
        .arg("--script")
        .arg(&script)
        .arg("--mask")
        .arg(&mask)
        .arg("--save-strokes")
        .arg(&saved)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 stroke(s)"));

    let strokes = maskscribe::script::load_strokes(&saved).unwrap();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].mode(), StrokeMode::Paint);
    assert_eq!(read_png(&mask).pixel(40, 30), Some(0xFFFF_FFFF));
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    let image = write_image(temp.path());
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "[brush\nmin_width = ").unwrap();

    maskscribe_cmd()
        .arg("--image")
        .arg(&image)
        .arg("--script")
        .arg(temp.path().join("unused.json"))
        .arg("--mask")
        .arg(temp.path().join("mask.png"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
