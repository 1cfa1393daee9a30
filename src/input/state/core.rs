//! Gesture state machine and editor session state.

use std::time::{Duration, Instant};

use cairo::Matrix;

use crate::config::{BrushConfig, Config};
use crate::draw::{BrushStyle, ClearScope, LassoOutline, Point, Stroke, StrokeList, StrokeMode};
use crate::error::EngineError;
use crate::input::events::EditorEvent;
use crate::input::mode::PaintMode;
use crate::transform::ViewTransform;

/// Current gesture state.
///
/// Tracks whether the user is idle, tracking a finger that has not reached the
/// image yet, drawing, or panning/zooming with several fingers.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    /// No finger down
    Idle,
    /// Primary finger down outside the image; drawing starts once it enters
    Tracking {
        pointer: u32,
        /// Last position in image pixels
        last: Point,
    },
    /// Single finger drawing a stroke
    Drawing {
        pointer: u32,
        /// Brush captured when the gesture started
        style: BrushStyle,
        /// Accumulated points in image pixels
        points: Vec<Point>,
        /// Pending commit deadline; `None` once fired or cancelled
        commit_at: Option<Instant>,
        /// Whether the commit timer has fired
        committed: bool,
        /// Index in the stroke list of the stroke promoted when the timer
        /// fired; rewritten in place as the gesture continues
        promoted: Option<usize>,
        /// Whether any move was seen after the first point
        moved: bool,
    },
    /// Two or more fingers; events belong to the pan/zoom handler
    MultiTouch,
}

/// Last consumed touch position in both coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub screen: Point,
    pub image: Point,
}

/// Editing session state: stroke list, brush settings, view transform, and
/// the gesture state machine.
pub struct EditorState {
    /// Committed strokes in draw order
    pub strokes: StrokeList,
    /// Current gesture state machine
    pub state: GestureState,
    /// Whether the view needs to be redrawn
    pub needs_redraw: bool,
    /// Whether the mask buffer must be recomposited from the stroke list
    pub needs_composite: bool,
    /// Whether the on-canvas brush indicator may be shown
    pub show_indicator: bool,
    pub(crate) mode: PaintMode,
    pub(crate) brush_size: f64,
    pub(crate) brush: BrushConfig,
    pub(crate) commit_delay: Duration,
    pub(crate) preview_duration: Duration,
    pub(crate) transform: ViewTransform,
    pub(crate) initial_scale: Option<f64>,
    pub(crate) image_width: i32,
    pub(crate) image_height: i32,
    pub(crate) active_pointers: Vec<u32>,
    pub(crate) last_touch: Option<TouchPoint>,
    /// Commit timer fired and the finger is still down
    pub(crate) touching: bool,
    pub(crate) magnifier_visible: bool,
    pub(crate) preview_until: Option<Instant>,
    pub(crate) touch_disabled: bool,
    events: Vec<EditorEvent>,
}

impl EditorState {
    /// Creates the session state for an image of `width × height` pixels.
    pub fn with_defaults(width: i32, height: i32, config: &Config) -> Self {
        Self {
            strokes: StrokeList::new(),
            state: GestureState::Idle,
            needs_redraw: true,
            needs_composite: true,
            show_indicator: true,
            mode: PaintMode::default(),
            brush_size: config.brush.default_size,
            brush: config.brush.clone(),
            commit_delay: Duration::from_millis(config.gesture.commit_delay_ms),
            preview_duration: Duration::from_millis(config.gesture.indicator_preview_ms),
            transform: ViewTransform::default(),
            initial_scale: None,
            image_width: width,
            image_height: height,
            active_pointers: Vec::new(),
            last_touch: None,
            touching: false,
            magnifier_visible: false,
            preview_until: None,
            touch_disabled: false,
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    /// Switches the paint mode used by the next gesture.
    pub fn set_mode(&mut self, mode: PaintMode) {
        if self.mode != mode {
            log::debug!("Paint mode {} -> {}", self.mode, mode);
            self.mode = mode;
            self.needs_redraw = true;
        }
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Sets the brush size (0.0 - 1.0).
    ///
    /// With `preview_at`, a size preview is shown from that instant for the
    /// configured preview duration.
    pub fn set_brush_size(&mut self, size: f64, preview_at: Option<Instant>) {
        let size = if size.is_nan() { 0.0 } else { size.clamp(0.0, 1.0) };
        self.brush_size = size;
        if let Some(now) = preview_at {
            self.preview_until = Some(now + self.preview_duration);
        }
        self.needs_redraw = true;
    }

    /// Diameter of the brush indicator in screen pixels.
    ///
    /// Lasso mode always shows the default size since the lasso fill ignores
    /// brush width.
    pub fn indicator_size(&self) -> f64 {
        if self.mode.is_lasso() {
            self.brush.width_for_size(self.brush.default_size)
        } else {
            self.brush.width_for_size(self.brush_size)
        }
    }

    /// Width in image pixels of strokes started now.
    pub fn brush_width(&self) -> f64 {
        self.indicator_size() / self.scale()
    }

    /// Brush captured at gesture start.
    pub fn current_style(&self) -> BrushStyle {
        BrushStyle {
            mode: self.mode.stroke_mode(),
            width: self.brush_width(),
        }
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    fn scale(&self) -> f64 {
        let scale = self.transform.scale();
        if scale > 0.0 { scale } else { 1.0 }
    }

    /// Installs a new image→screen matrix from the pan/zoom controller.
    ///
    /// The first matrix pushed with `is_init` records the initial scale used
    /// for the lasso outline width. Invalid matrices leave the previous
    /// transform in place.
    pub fn set_transform(&mut self, matrix: Matrix, is_init: bool) -> Result<(), EngineError> {
        if let Err(err) = self.transform.set(matrix) {
            log::warn!("Rejected view transform: {}", err);
            return Err(err);
        }
        if is_init && self.initial_scale.is_none() {
            self.initial_scale = Some(self.transform.scale());
        }
        self.needs_redraw = true;
        Ok(())
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
            .filter(|scale| *scale > 0.0)
            .unwrap_or_else(|| self.scale())
    }

    /// Outline style for the in-progress lasso path, in image pixels.
    pub fn lasso_outline(&self) -> LassoOutline {
        let scale = self.initial_scale();
        LassoOutline {
            color: self.brush.lasso_color.to_color(),
            width: self.brush.lasso_width / scale,
            dash: self.brush.lasso_dash / scale,
        }
    }

    pub fn image_size(&self) -> (i32, i32) {
        (self.image_width, self.image_height)
    }

    /// Whether an image-pixel point lies inside the image.
    pub fn is_inside_image(&self, image: Point) -> bool {
        let normalized = ViewTransform::normalize(image, self.image_width, self.image_height);
        ViewTransform::is_inside_normalized(normalized)
    }

    pub fn set_touch_disabled(&mut self, disabled: bool) {
        self.touch_disabled = disabled;
    }

    pub fn is_touch_disabled(&self) -> bool {
        self.touch_disabled
    }

    pub fn set_show_indicator(&mut self, show: bool) {
        if self.show_indicator != show {
            self.show_indicator = show;
            self.needs_redraw = true;
        }
    }

    /// True while the on-canvas indicator should be drawn at the touch point.
    pub fn indicator_visible(&self) -> bool {
        self.show_indicator && self.touching
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub fn magnifier_visible(&self) -> bool {
        self.magnifier_visible
    }

    pub fn last_touch(&self) -> Option<TouchPoint> {
        self.last_touch
    }

    /// True while the brush-size preview should be drawn.
    pub fn preview_active(&self) -> bool {
        self.preview_until.is_some()
    }

    /// Earliest pending deadline (commit timer or preview expiry), for hosts
    /// that schedule a wake-up and call `advance`.
    pub fn next_deadline(&self) -> Option<Instant> {
        let commit = match &self.state {
            GestureState::Drawing { commit_at, .. } => *commit_at,
            _ => None,
        };
        match (commit, self.preview_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// In-progress freehand stroke for live preview. `None` while idle, in
    /// lasso mode, or once the stroke has been promoted into the list.
    pub fn pending_stroke(&self) -> Option<Stroke> {
        match &self.state {
            GestureState::Drawing {
                style,
                points,
                promoted: None,
                ..
            } if style.mode != StrokeMode::LassoFill => style.stroke(points.clone()),
            _ => None,
        }
    }

    /// In-progress lasso path in image pixels.
    pub fn lasso_path(&self) -> Option<&[Point]> {
        match &self.state {
            GestureState::Drawing { style, points, .. } if style.mode == StrokeMode::LassoFill => {
                Some(points)
            }
            _ => None,
        }
    }

    /// Replaces the committed strokes (undo/redo snapshot restore).
    pub fn set_strokes(&mut self, strokes: Vec<Stroke>) {
        self.forget_promoted();
        self.strokes.replace(strokes);
        self.needs_composite = true;
        self.needs_redraw = true;
    }

    /// Clears strokes in `scope`. Returns whether the list had any strokes.
    pub fn clear_drawing(&mut self, scope: ClearScope) -> bool {
        let had_strokes = self.strokes.clear(scope);
        if had_strokes {
            self.forget_promoted();
            log::info!("Cleared strokes ({:?})", scope);
            self.needs_composite = true;
            self.needs_redraw = true;
        }
        had_strokes
    }

    /// Removes the non-restore strokes an inpaint consumed.
    ///
    /// Strokes committed after the request snapshot was taken, and a promoted
    /// stroke that has grown since, stay in the list. Returns how many strokes
    /// were removed.
    pub fn remove_consumed(&mut self, consumed: &[Stroke]) -> usize {
        let removed = self.strokes.remove_consumed(consumed);
        if removed.is_empty() {
            return 0;
        }
        if let GestureState::Drawing { promoted, .. } = &mut self.state {
            *promoted = match *promoted {
                Some(index) if removed.binary_search(&index).is_err() => {
                    Some(index - removed.iter().filter(|r| **r < index).count())
                }
                _ => None,
            };
        }
        log::info!("Removed {} inpainted stroke(s)", removed.len());
        self.needs_composite = true;
        self.needs_redraw = true;
        removed.len()
    }

    /// The list was replaced or cleared under a promoted stroke; the next
    /// move re-adds it at the end.
    fn forget_promoted(&mut self) {
        if let GestureState::Drawing { promoted, .. } = &mut self.state {
            *promoted = None;
        }
    }

    /// Takes the notifications published since the last call.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queues `event`. Only the latest `Touch` is kept, so hosts that drain
    /// rarely do not accumulate one entry per pointer sample.
    pub(crate) fn publish(&mut self, event: EditorEvent) {
        if matches!(event, EditorEvent::Touch { .. }) {
            self.events
                .retain(|queued| !matches!(queued, EditorEvent::Touch { .. }));
        }
        self.events.push(event);
    }
}
