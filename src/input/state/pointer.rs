use std::time::Instant;

use crate::draw::{Point, Stroke, StrokeList, StrokeMode};
use crate::input::events::{EditorEvent, PointerDisposition, PointerEvent, PointerPhase};
use crate::transform::clip_entry;

use super::core::TouchPoint;
use super::{EditorState, GestureState};

impl EditorState {
    /// Processes one pointer event.
    ///
    /// Pending timers are advanced to the event's timestamp first, so a commit
    /// that was due before this event fires before it is handled.
    ///
    /// # Behavior
    /// - Primary down inside the image: starts a stroke and arms the commit timer
    /// - Primary down outside: tracks the finger until it enters the image
    /// - Second finger down: cancels the gesture and forwards to pan/zoom
    /// - Up/Cancel: closes the stroke and publishes `GestureEnded`
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerDisposition {
        if self.touch_disabled {
            return PointerDisposition::Ignored;
        }

        self.advance(event.time);

        match event.phase {
            PointerPhase::Down => self.on_pointer_down(event),
            PointerPhase::Move => self.on_pointer_move(event),
            PointerPhase::Up | PointerPhase::Cancel => self.on_pointer_up(event),
        }
    }

    /// Fires timers that are due at `now`.
    ///
    /// Returns true when the commit timer fired.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.preview_until.is_some_and(|until| now >= until) {
            self.preview_until = None;
            self.needs_redraw = true;
        }

        let inside = self
            .last_touch
            .is_some_and(|touch| self.is_inside_image(touch.image));

        let GestureState::Drawing {
            style,
            points,
            commit_at,
            committed,
            promoted,
            ..
        } = &mut self.state
        else {
            return false;
        };
        match *commit_at {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }

        *commit_at = None;
        *committed = true;
        // Lasso paths only become strokes once closed on release
        if style.mode != StrokeMode::LassoFill {
            if let Some(stroke) = style.stroke(points.clone()) {
                store_promoted(&mut self.strokes, promoted, stroke);
                self.needs_composite = true;
            }
        }
        self.touching = true;
        self.magnifier_visible = inside;
        self.needs_redraw = true;
        log::debug!("Commit timer fired");
        true
    }

    fn on_pointer_down(&mut self, event: PointerEvent) -> PointerDisposition {
        if self.active_pointers.contains(&event.id) {
            log::warn!("Duplicate pointer-down for id {}, ignoring", event.id);
            return PointerDisposition::Ignored;
        }

        let multi_touch =
            matches!(self.state, GestureState::MultiTouch) || !self.active_pointers.is_empty();
        if !multi_touch && !event.primary {
            log::debug!("Non-primary pointer {} down with no gesture, ignoring", event.id);
            return PointerDisposition::Ignored;
        }

        self.active_pointers.push(event.id);
        if multi_touch {
            self.enter_multi_touch();
            return PointerDisposition::Forward;
        }

        self.preview_until = None;
        let image = self.record_touch(event.position);

        if self.is_inside_image(image) {
            self.start_drawing(event.id, vec![image], false, event.time);
        } else {
            log::debug!("Pointer down outside image at {:?}", image);
            self.state = GestureState::Tracking {
                pointer: event.id,
                last: image,
            };
            self.magnifier_visible = false;
        }

        self.needs_redraw = true;
        PointerDisposition::Consumed
    }

    fn on_pointer_move(&mut self, event: PointerEvent) -> PointerDisposition {
        if !self.active_pointers.contains(&event.id) {
            return PointerDisposition::Ignored;
        }
        match self.state {
            GestureState::MultiTouch => return PointerDisposition::Forward,
            GestureState::Idle => return PointerDisposition::Ignored,
            _ => {}
        }

        let image = self.record_touch(event.position);
        let inside = self.is_inside_image(image);
        let (width, height) = (self.image_width as f64, self.image_height as f64);

        let mut entered_from = None;
        match &mut self.state {
            GestureState::Tracking { last, .. } => {
                if inside {
                    entered_from = Some(*last);
                } else {
                    *last = image;
                }
            }
            GestureState::Drawing {
                style,
                points,
                moved,
                committed,
                promoted,
                ..
            } => {
                points.push(image);
                *moved = true;
                if *committed && style.mode != StrokeMode::LassoFill {
                    if let Some(stroke) = style.stroke(points.clone()) {
                        store_promoted(&mut self.strokes, promoted, stroke);
                    }
                }
                self.magnifier_visible = *committed && inside;
                self.needs_composite = true;
            }
            GestureState::Idle | GestureState::MultiTouch => {}
        }

        if let Some(last) = entered_from {
            let entry = clip_entry(last, image, width, height).unwrap_or(image);
            log::debug!("Pointer entered image at {:?}", entry);
            let mut points = vec![entry];
            if entry != image {
                points.push(image);
            }
            self.start_drawing(event.id, points, true, event.time);
        }

        self.needs_redraw = true;
        PointerDisposition::Consumed
    }

    fn on_pointer_up(&mut self, event: PointerEvent) -> PointerDisposition {
        let Some(index) = self.active_pointers.iter().position(|id| *id == event.id) else {
            log::debug!("Pointer-up for unknown id {}, ignoring", event.id);
            return PointerDisposition::Ignored;
        };
        self.active_pointers.remove(index);

        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::MultiTouch => {
                if !self.active_pointers.is_empty() {
                    self.state = GestureState::MultiTouch;
                }
                PointerDisposition::Forward
            }
            GestureState::Idle | GestureState::Tracking { .. } => {
                self.end_touch();
                PointerDisposition::Consumed
            }
            GestureState::Drawing {
                style,
                mut points,
                moved,
                mut promoted,
                ..
            } => {
                let image = self.transform.screen_to_image(event.position);
                points.push(image.rounded());

                let stroke = if style.mode == StrokeMode::LassoFill && !moved {
                    None
                } else {
                    style.stroke(points)
                };
                match stroke {
                    Some(stroke) => {
                        log::debug!(
                            "Committed {} stroke with {} point(s), width {:.2}",
                            stroke.mode().label(),
                            stroke.points().len(),
                            stroke.width()
                        );
                        store_promoted(&mut self.strokes, &mut promoted, stroke);
                    }
                    None => log::debug!("Lasso tap without movement, no stroke"),
                }

                self.needs_composite = true;
                self.publish(EditorEvent::GestureEnded);
                self.end_touch();
                PointerDisposition::Consumed
            }
        }
    }

    /// Cancels the current gesture because a second finger landed.
    ///
    /// A stroke whose commit timer already fired is kept; otherwise it is
    /// discarded. In-progress lasso paths are always discarded.
    fn enter_multi_touch(&mut self) {
        if matches!(self.state, GestureState::MultiTouch) {
            return;
        }

        let previous = std::mem::replace(&mut self.state, GestureState::MultiTouch);
        if let GestureState::Drawing {
            style,
            points,
            committed,
            mut promoted,
            ..
        } = previous
        {
            if committed && style.mode != StrokeMode::LassoFill {
                if let Some(stroke) = style.stroke(points) {
                    store_promoted(&mut self.strokes, &mut promoted, stroke);
                }
                log::debug!("Multi-touch: kept partial {} stroke", style.mode.label());
            } else {
                log::debug!("Multi-touch: discarded uncommitted stroke");
            }
            self.needs_composite = true;
        }

        self.publish(EditorEvent::GestureEnded);
        self.end_touch();
    }

    fn start_drawing(&mut self, pointer: u32, points: Vec<Point>, moved: bool, now: Instant) {
        self.state = GestureState::Drawing {
            pointer,
            style: self.current_style(),
            points,
            commit_at: Some(now + self.commit_delay),
            committed: false,
            promoted: None,
            moved,
        };
        self.needs_composite = true;
        // A zero delay commits immediately
        self.advance(now);
    }

    fn record_touch(&mut self, screen: Point) -> Point {
        let image = self.transform.screen_to_image(screen);
        self.last_touch = Some(TouchPoint { screen, image });
        self.publish(EditorEvent::Touch { screen });
        image
    }

    fn end_touch(&mut self) {
        self.touching = false;
        self.magnifier_visible = false;
        self.needs_redraw = true;
    }
}

/// Writes the promoted stroke back into its slot, appending it when the slot
/// is gone (the list was cleared or replaced mid-gesture).
fn store_promoted(strokes: &mut StrokeList, promoted: &mut Option<usize>, stroke: Stroke) {
    let stroke = match *promoted {
        Some(index) => match strokes.set_at(index, stroke) {
            Ok(()) => return,
            Err(stroke) => stroke,
        },
        None => stroke,
    };
    strokes.push(stroke);
    *promoted = Some(strokes.len() - 1);
}
