//! Touch gesture handling.
//!
//! A gesture starts with [`TouchAction::Down`] and passes through
//! [`InteractionPhase::PossibleDrag`] until the pointer either leaves the
//! touch slop, which turns it into a drag, or lifts, which makes it a tap.
//! Tracking listeners see exactly one `Started`/`Stopped` pair for every
//! gesture that moved a thumb, except for cancelled gestures, which end
//! silently.

use tracing::{debug, trace};

use super::Slider;
use crate::error::Result;

/// Kind of pointer event delivered to [`Slider::on_touch_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    pub fn new(action: TouchAction, x: f32, y: f32) -> Self {
        Self { action, x, y }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(TouchAction::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(TouchAction::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(TouchAction::Up, x, y)
    }

    pub fn cancel(x: f32, y: f32) -> Self {
        Self::new(TouchAction::Cancel, x, y)
    }
}

/// Interaction state of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionPhase {
    /// No gesture and no keyboard-captured thumb.
    #[default]
    Idle,
    /// A touch is down but has not left the touch slop yet.
    PossibleDrag,
    /// A touch is moving a thumb.
    Dragging,
    /// A thumb was captured from the keyboard.
    KeyboardActive,
}

/// Per-gesture bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct GestureState {
    pub touch_down_x: f32,
    /// Normalized, unmirrored position of the latest pointer event.
    pub touch_position: f32,
    pub last_event: Option<TouchEvent>,
    pub tracking: bool,
    pub pressed: bool,
}

impl Slider {
    /// Feeds a pointer event to the slider.
    ///
    /// Returns whether the event was consumed. Disabled sliders consume
    /// nothing. Invalid configuration is reported before any state changes.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_touch_event(&mut self, event: TouchEvent) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.values.validate()?;

        let touch_position = self.mapper().pixel_to_normalized(event.x);
        let handled = match event.action {
            TouchAction::Down => self.on_touch_down(event, touch_position),
            TouchAction::Move => self.on_touch_move(event, touch_position),
            TouchAction::Up => self.on_touch_up(event, touch_position),
            TouchAction::Cancel => {
                self.cancel_gesture();
                return Ok(true);
            }
        };
        self.gesture.last_event = Some(event);
        Ok(handled)
    }

    fn on_touch_down(&mut self, event: TouchEvent, touch_position: f32) -> bool {
        // The host never finished the previous gesture.
        self.stop_tracking();
        self.gesture = GestureState {
            touch_down_x: event.x,
            touch_position,
            ..Default::default()
        };
        self.active_index = None;
        self.phase = InteractionPhase::PossibleDrag;

        // Inside a scroller the touch may still turn into a scroll, so no
        // thumb is captured until it moves past the slop.
        if self.in_scrolling_container {
            return true;
        }

        let Some(index) = self.pick_active_thumb() else {
            trace!("touch down did not resolve a thumb");
            return true;
        };
        debug!(index, "touch down captured thumb");
        self.has_focus = true;
        self.phase = InteractionPhase::Dragging;
        self.gesture.pressed = true;
        self.start_tracking();
        self.snap_touch_position();
        true
    }

    fn on_touch_move(&mut self, event: TouchEvent, touch_position: f32) -> bool {
        match self.phase {
            InteractionPhase::PossibleDrag => {
                if (event.x - self.gesture.touch_down_x).abs() < self.touch_slop {
                    return false;
                }
                self.phase = InteractionPhase::Dragging;
                self.start_tracking();
            }
            InteractionPhase::Dragging => {}
            InteractionPhase::Idle | InteractionPhase::KeyboardActive => return false,
        }

        self.gesture.touch_position = touch_position;
        if self.pick_active_thumb().is_none() {
            return true;
        }
        self.gesture.pressed = true;
        self.snap_touch_position();
        true
    }

    fn on_touch_up(&mut self, event: TouchEvent, touch_position: f32) -> bool {
        if !matches!(
            self.phase,
            InteractionPhase::PossibleDrag | InteractionPhase::Dragging
        ) {
            return false;
        }
        self.gesture.pressed = false;
        self.gesture.touch_position = touch_position;

        // A tap without movement gets another chance to resolve a thumb.
        if let Some(last) = self.gesture.last_event
            && last.action == TouchAction::Down
            && (last.x - event.x).abs() <= self.touch_slop
            && (last.y - event.y).abs() <= self.touch_slop
        {
            self.pick_active_thumb();
        }

        if self.active_index.is_some() {
            self.start_tracking();
            self.snap_touch_position();
            self.active_index = None;
        }
        self.stop_tracking();
        self.phase = InteractionPhase::Idle;
        true
    }

    /// Abandons the current gesture without notifying tracking listeners.
    fn cancel_gesture(&mut self) {
        if self.gesture.tracking {
            debug!("touch gesture cancelled");
        }
        self.gesture = GestureState::default();
        self.active_index = None;
        self.phase = InteractionPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        mapping::LayoutDirection,
        slider::{
            InteractionPhase, TouchEvent, TouchTracking,
            tests::{Observed, record, slider, user_change},
        },
    };

    #[test]
    fn tap_between_two_thumbs_moves_the_lower_one() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0, 80.0]);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(50.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::up(50.0, 0.0)).unwrap();

        assert_eq!(slider.values(), &[50.0, 80.0]);
        assert_eq!(slider.focused_index(), 0);
        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 50.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
        assert_eq!(slider.phase(), InteractionPhase::Idle);
        assert_eq!(slider.active_index(), None);
    }

    #[test]
    fn drag_snaps_to_steps() {
        let mut slider = slider(0.0, 10.0, 2.0, &[4.0]);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(40.0, 0.0)).unwrap();
        // 4.99 rounds back onto the thumb's current step.
        slider.on_touch_event(TouchEvent::moved(49.9, 0.0)).unwrap();
        assert_eq!(slider.values(), &[4.0]);
        slider.on_touch_event(TouchEvent::moved(51.0, 0.0)).unwrap();
        assert_eq!(slider.values(), &[6.0]);
        slider.on_touch_event(TouchEvent::up(51.0, 0.0)).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 6.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn dragging_into_a_neighbour_stops_at_the_separation() {
        let mut slider = slider(0.0, 100.0, 0.0, &[30.0, 70.0]);
        slider.set_min_separation_value(10.0);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(30.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::moved(65.0, 0.0)).unwrap();
        assert_eq!(slider.values(), &[60.0, 70.0]);
        // Pushing further does not produce duplicate notifications.
        slider.on_touch_event(TouchEvent::moved(68.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::up(68.0, 0.0)).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 60.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn pixel_separation_holds_in_both_directions() {
        for (direction, start, push, limit) in [
            (LayoutDirection::LeftToRight, 30.0, 65.0, 80.0),
            (LayoutDirection::RightToLeft, 70.0, 45.0, 40.0),
        ] {
            let mut slider = slider(0.0, 100.0, 0.0, &[30.0, 70.0]);
            slider.set_direction(direction);
            slider.set_min_separation(20.0);
            let log = record(&mut slider);

            slider.on_touch_event(TouchEvent::down(start, 0.0)).unwrap();
            assert_eq!(slider.active_index(), Some(0));
            slider.on_touch_event(TouchEvent::moved(push, 0.0)).unwrap();
            assert!((slider.values()[0] - 50.0).abs() < 1e-3, "{direction:?}");
            slider.on_touch_event(TouchEvent::moved(limit, 0.0)).unwrap();
            slider.on_touch_event(TouchEvent::up(limit, 0.0)).unwrap();
            assert!((slider.values()[0] - 50.0).abs() < 1e-3, "{direction:?}");
            assert_eq!(slider.values()[1], 70.0);

            let log = log.lock();
            assert_eq!(log.len(), 3, "{direction:?}");
            assert_eq!(log[0], Observed::Touch(TouchTracking::Started));
            assert!(matches!(log[1], Observed::Change(change) if change.index == 0));
            assert_eq!(log[2], Observed::Touch(TouchTracking::Stopped));
        }
    }

    #[test]
    fn rtl_leftmost_touch_selects_the_maximum() {
        let mut slider = slider(0.0, 1.0, 0.0, &[0.5]);
        slider.set_direction(LayoutDirection::RightToLeft);

        slider.on_touch_event(TouchEvent::down(0.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::up(0.0, 0.0)).unwrap();
        assert!((slider.values()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cancel_ends_the_gesture_silently() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0]);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(20.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::moved(40.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::cancel(40.0, 0.0)).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 40.0),
            ]
        );
        assert_eq!(slider.phase(), InteractionPhase::Idle);
        assert!(!slider.is_pressed());

        // A later up belongs to no gesture.
        assert!(!slider.on_touch_event(TouchEvent::up(40.0, 0.0)).unwrap());
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn unfinished_gesture_ends_on_the_next_touch_down() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0]);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(20.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::moved(40.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::down(70.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::up(70.0, 0.0)).unwrap();

        assert_eq!(slider.values(), &[70.0]);
        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 40.0),
                Observed::Touch(TouchTracking::Stopped),
                Observed::Touch(TouchTracking::Started),
                user_change(0, 70.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn scrolling_container_defers_capture_until_the_slop_is_exceeded() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0]);
        slider.set_in_scrolling_container(true);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(50.0, 0.0)).unwrap();
        assert_eq!(slider.active_index(), None);
        assert!(log.lock().is_empty());

        // Within the slop nothing happens.
        assert!(!slider.on_touch_event(TouchEvent::moved(54.0, 0.0)).unwrap());
        assert!(log.lock().is_empty());

        slider.on_touch_event(TouchEvent::moved(70.0, 0.0)).unwrap();
        assert_eq!(slider.active_index(), Some(0));
        assert_eq!(slider.values(), &[70.0]);
        slider.on_touch_event(TouchEvent::up(70.0, 0.0)).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 70.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn tap_in_a_scrolling_container_moves_the_thumb() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0]);
        slider.set_in_scrolling_container(true);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(60.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::up(61.0, 1.0)).unwrap();

        assert_eq!(slider.values(), &[61.0]);
        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 61.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn ambiguous_touch_resolves_once_the_pointer_moves() {
        let mut slider = slider(0.0, 100.0, 0.0, &[50.0, 50.0]);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(52.0, 0.0)).unwrap();
        assert_eq!(slider.active_index(), None);
        assert!(log.lock().is_empty());

        slider.on_touch_event(TouchEvent::moved(80.0, 0.0)).unwrap();
        assert_eq!(slider.active_index(), Some(1));
        assert_eq!(slider.values(), &[50.0, 80.0]);
        slider.on_touch_event(TouchEvent::up(80.0, 0.0)).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(1, 80.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn disabled_slider_ignores_touches() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0]);
        slider.set_enabled(false);
        let log = record(&mut slider);

        assert!(!slider.on_touch_event(TouchEvent::down(60.0, 0.0)).unwrap());
        assert!(!slider.on_touch_event(TouchEvent::up(60.0, 0.0)).unwrap());
        assert_eq!(slider.values(), &[20.0]);
        assert!(log.lock().is_empty());
    }
}
