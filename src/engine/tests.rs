use std::time::{Duration, Instant};

use cairo::{Context, Format, ImageSurface, Matrix};

use super::MaskEngine;
use crate::config::Config;
use crate::draw::color::{BLACK, BLUE, WHITE};
use crate::draw::{BinaryMask, Bitmap, ClearScope, Point, Stroke, StrokeMode};
use crate::inpaint::InpaintResult;
use crate::input::{EditorEvent, PaintMode, PointerDisposition, PointerEvent, PointerPhase};

struct Clock(Instant);

impl Clock {
    fn at(&self, ms: u64) -> Instant {
        self.0 + Duration::from_millis(ms)
    }
}

fn engine_with(image: Bitmap, config: Config) -> (MaskEngine, Clock) {
    (MaskEngine::new(image, config).unwrap(), Clock(Instant::now()))
}

fn blue_engine() -> (MaskEngine, Clock) {
    engine_with(Bitmap::filled(100, 100, BLUE).unwrap(), Config::default())
}

fn send(
    engine: &mut MaskEngine,
    clock: &Clock,
    phase: PointerPhase,
    (x, y): (f64, f64),
    ms: u64,
) -> PointerDisposition {
    engine
        .handle_pointer(PointerEvent::new(1, phase, x, y, true, clock.at(ms)))
        .unwrap()
}

/// Press, wait past the commit delay, drag right, release.
fn drag(engine: &mut MaskEngine, clock: &Clock, from: (f64, f64), to: (f64, f64)) {
    send(engine, clock, PointerPhase::Down, from, 0);
    engine.advance(clock.at(60)).unwrap();
    send(engine, clock, PointerPhase::Move, to, 70);
    send(engine, clock, PointerPhase::Up, to, 80);
}

#[test]
fn new_engine_has_no_marks() {
    let (mut engine, _) = blue_engine();
    assert_eq!(engine.image_size(), (100, 100));
    assert!(!engine.has_marks().unwrap());
    assert!(engine.extract_binary_mask().unwrap().is_empty());
    assert!(engine.strokes().is_empty());
}

#[test]
fn paint_gesture_marks_buffer_and_mask() {
    let (mut engine, clock) = blue_engine();
    drag(&mut engine, &clock, (30.0, 50.0), (70.0, 50.0));

    assert_eq!(engine.strokes().len(), 1);
    assert!(engine.has_marks().unwrap());
    let mask = engine.extract_binary_mask().unwrap();
    assert!(mask.is_marked(50, 50));
    assert!(!mask.is_marked(50, 90));
    assert!(engine.take_events().contains(&EditorEvent::GestureEnded));
}

#[test]
fn live_stroke_shows_before_release() {
    let (mut engine, clock) = blue_engine();
    send(&mut engine, &clock, PointerPhase::Down, (30.0, 50.0), 0);
    send(&mut engine, &clock, PointerPhase::Move, (60.0, 50.0), 10);

    assert!(engine.strokes().is_empty());
    assert!(engine.has_marks().unwrap());
    // Nothing committed yet, so nothing to export
    assert!(engine.extract_binary_mask().unwrap().is_empty());
}

#[test]
fn commit_timer_shows_magnifier() {
    let (mut engine, clock) = blue_engine();
    send(&mut engine, &clock, PointerPhase::Down, (50.0, 50.0), 0);
    assert!(!engine.state.magnifier_visible());
    let blank = engine.magnifier_snapshot().unwrap();

    assert!(engine.advance(clock.at(60)).unwrap());
    assert!(engine.state.magnifier_visible());
    let loupe = engine.magnifier_snapshot().unwrap();
    assert_ne!(loupe, blank);
    assert!(!loupe.is_fully_transparent());
}

#[test]
fn restore_reveals_restore_image_and_stays_out_of_mask() {
    let (mut engine, clock) = blue_engine();
    engine.set_mode(PaintMode::Restore);
    drag(&mut engine, &clock, (30.0, 50.0), (70.0, 50.0));

    let composite = engine.composite_bitmap().unwrap();
    assert_eq!(composite.pixel(50, 50), Some(0xFF00_00FF));
    assert!(engine.extract_binary_mask().unwrap().is_empty());
}

#[test]
fn set_restore_image_recomposites() {
    let (mut engine, clock) = blue_engine();
    engine.set_mode(PaintMode::Restore);
    drag(&mut engine, &clock, (30.0, 50.0), (70.0, 50.0));

    engine
        .set_restore_image(&Bitmap::filled(100, 100, WHITE).unwrap())
        .unwrap();
    let composite = engine.composite_bitmap().unwrap();
    assert_eq!(composite.pixel(50, 50), Some(0xFFFF_FFFF));
}

#[test]
fn set_strokes_supports_undo() {
    let (mut engine, clock) = blue_engine();
    let before = engine.get_strokes();
    drag(&mut engine, &clock, (30.0, 50.0), (70.0, 50.0));
    assert!(engine.has_marks().unwrap());

    engine.set_strokes(before).unwrap();
    assert!(!engine.has_marks().unwrap());
}

#[test]
fn clear_drawing_reports_prior_strokes() {
    let (mut engine, clock) = blue_engine();
    assert!(!engine.clear_drawing(ClearScope::All).unwrap());

    drag(&mut engine, &clock, (30.0, 50.0), (70.0, 50.0));
    assert!(engine.clear_drawing(ClearScope::All).unwrap());
    assert!(!engine.has_marks().unwrap());
}

#[test]
fn apply_inpaint_result_keeps_restore_strokes() {
    let (mut engine, _) = blue_engine();
    engine
        .set_strokes(vec![
            Stroke::dot(StrokeMode::Paint, 10.0, Point::new(20.0, 20.0)),
            Stroke::dot(StrokeMode::Restore, 10.0, Point::new(80.0, 80.0)),
        ])
        .unwrap();
    engine.set_mode(PaintMode::Erase);

    let request = engine.inpaint_request();
    assert_eq!(request.strokes.len(), 2);
    assert_eq!(request.image.dimensions(), (100, 100));

    let mask = BinaryMask::from_alpha(&Bitmap::new(100, 100).unwrap());
    engine
        .apply_inpaint_result(InpaintResult {
            image: Bitmap::filled(100, 100, WHITE).unwrap(),
            mask,
            strokes: request.strokes,
        })
        .unwrap();

    assert_eq!(engine.display_image().pixel(0, 0), Some(0xFFFF_FFFF));
    assert_eq!(engine.strokes().len(), 1);
    assert!(engine.strokes()[0].is_restore());
    assert_eq!(engine.state.mode(), PaintMode::Paint);
}

#[test]
fn apply_inpaint_result_keeps_strokes_committed_after_request() {
    let (mut engine, clock) = blue_engine();
    let consumed = Stroke::dot(StrokeMode::Paint, 10.0, Point::new(20.0, 20.0));
    let restore = Stroke::dot(StrokeMode::Restore, 10.0, Point::new(80.0, 80.0));
    engine
        .set_strokes(vec![consumed, restore.clone()])
        .unwrap();

    let request = engine.inpaint_request();
    drag(&mut engine, &clock, (30.0, 50.0), (70.0, 50.0));
    let later = engine.strokes()[2].clone();

    let mask = BinaryMask::from_alpha(&Bitmap::new(100, 100).unwrap());
    engine
        .apply_inpaint_result(InpaintResult {
            image: Bitmap::filled(100, 100, WHITE).unwrap(),
            mask,
            strokes: request.strokes,
        })
        .unwrap();

    assert_eq!(engine.strokes(), &[restore, later]);
    let mask = engine.extract_binary_mask().unwrap();
    assert!(mask.is_marked(50, 50));
    assert!(!mask.is_marked(20, 20));
}

#[test]
fn committed_stroke_reaches_mask_before_release() {
    let (mut engine, clock) = blue_engine();
    send(&mut engine, &clock, PointerPhase::Down, (30.0, 50.0), 0);
    engine.advance(clock.at(60)).unwrap();
    send(&mut engine, &clock, PointerPhase::Move, (70.0, 50.0), 70);

    assert_eq!(engine.strokes().len(), 1);
    let mask = engine.extract_binary_mask().unwrap();
    assert!(mask.is_marked(50, 50));

    send(&mut engine, &clock, PointerPhase::Up, (70.0, 50.0), 80);
    assert_eq!(engine.strokes().len(), 1);
}

#[test]
fn display_image_must_match_size() {
    let (mut engine, _) = blue_engine();
    let err = engine
        .set_display_image(Bitmap::new(50, 50).unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("50"));
    assert_eq!(engine.display_image().dimensions(), (100, 100));
}

#[test]
fn touch_disabled_ignores_pointers() {
    let (mut engine, clock) = blue_engine();
    engine.set_touch_disabled(true);
    assert_eq!(
        send(&mut engine, &clock, PointerPhase::Down, (50.0, 50.0), 0),
        PointerDisposition::Ignored
    );
    assert!(engine.take_events().is_empty());
}

fn render(engine: &mut MaskEngine, width: i32, height: i32) -> Bitmap {
    let mut surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    {
        let ctx = Context::new(&surface).unwrap();
        BLACK.apply(&ctx);
        ctx.paint().unwrap();
        engine
            .render_view(&ctx, width as f64, height as f64)
            .unwrap();
    }
    Bitmap::from_surface(&mut surface).unwrap()
}

#[test]
fn render_view_applies_transform() {
    let (mut engine, _) = engine_with(Bitmap::filled(20, 20, BLUE).unwrap(), Config::default());
    engine
        .set_transform(Matrix::new(2.0, 0.0, 0.0, 2.0, 10.0, 10.0), true)
        .unwrap();

    let view = render(&mut engine, 60, 60);
    assert_eq!(view.pixel(5, 5), Some(0xFF00_0000));
    assert_eq!(view.pixel(30, 30), Some(0xFF00_00FF));
    assert_eq!(view.pixel(55, 55), Some(0xFF00_0000));
    assert!(!engine.state.needs_redraw);
}

#[test]
fn render_view_draws_size_preview() {
    let (mut engine, clock) = engine_with(Bitmap::filled(20, 20, BLUE).unwrap(), Config::default());
    engine.set_brush_size(1.0, Some(clock.at(0)));
    assert!(engine.state.preview_active());

    let view = render(&mut engine, 200, 200);
    let preview_y = 200 - engine.config().gesture.preview_margin_bottom as i32;
    assert_ne!(view.pixel(100, preview_y), Some(0xFF00_0000));
}

#[test]
fn render_view_with_debug_overlay() {
    let mut config = Config::default();
    config.debug.enabled = true;
    let (mut engine, clock) = engine_with(Bitmap::filled(100, 100, BLUE).unwrap(), config);
    send(&mut engine, &clock, PointerPhase::Down, (50.0, 50.0), 0);
    engine.advance(clock.at(60)).unwrap();

    let view = render(&mut engine, 400, 400);
    assert_eq!(view.dimensions(), (400, 400));
}
