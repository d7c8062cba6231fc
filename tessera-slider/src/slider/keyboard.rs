//! Keyboard input and focus traversal between thumbs.

use tracing::debug;

use super::{InteractionPhase, Slider};
use crate::error::Result;

/// Keys a slider reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderKey {
    Left,
    Right,
    Minus,
    Plus,
    Tab,
    /// Tab with shift held.
    BackTab,
    /// Enter or a D-pad center press.
    Enter,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: SliderKey,
    /// Set while the key is held and auto-repeating.
    pub long_press: bool,
}

impl KeyEvent {
    pub fn new(key: SliderKey) -> Self {
        Self {
            key,
            long_press: false,
        }
    }

    pub fn long_press(key: SliderKey) -> Self {
        Self {
            key,
            long_press: true,
        }
    }
}

/// Direction focus arrived from when the slider gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Slider {
    /// Handles a key press.
    ///
    /// With a captured thumb, arrow and `+`/`-` keys move it, Tab and BackTab
    /// move capture to the neighbouring thumb and Enter releases it. Without
    /// one, the same keys move focus and Enter captures the focused thumb.
    /// A single-thumb slider always has its thumb captured. Keys are ignored
    /// while a touch gesture is in progress.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_key_down(&mut self, event: KeyEvent) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.values.validate()?;
        if matches!(
            self.phase,
            InteractionPhase::PossibleDrag | InteractionPhase::Dragging
        ) {
            debug!(key = ?event.key, "key ignored during a touch gesture");
            return Ok(false);
        }

        if self.values.len() == 1 {
            self.active_index = Some(0);
        }
        let Some(active) = self.active_index else {
            return Ok(self.on_key_down_without_active_thumb(event.key));
        };

        self.long_press |= event.long_press;
        if let Some(increment) = self.increment_for_key(event.key) {
            self.phase = InteractionPhase::KeyboardActive;
            if let Some(value) = self.values.get(active) {
                self.snap_thumb_to_value(active, value + increment);
            }
            return Ok(true);
        }

        match event.key {
            SliderKey::Tab => Ok(self.move_focus(1)),
            SliderKey::BackTab => Ok(self.move_focus(-1)),
            SliderKey::Enter => {
                self.active_index = None;
                self.phase = InteractionPhase::Idle;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Handles a key release, ending any long press acceleration.
    pub fn on_key_up(&mut self, _key: SliderKey) {
        self.long_press = false;
    }

    /// Handles focus moving into or out of the slider.
    ///
    /// Gaining focus picks the thumb on the side focus came from. Losing it
    /// releases the captured thumb and ends a tracked gesture, but keeps the
    /// focused index.
    pub fn on_focus_changed(&mut self, gained: bool, direction: Option<FocusDirection>) {
        if !gained {
            self.has_focus = false;
            self.active_index = None;
            self.stop_tracking();
            self.gesture = super::GestureState::default();
            self.phase = InteractionPhase::Idle;
            self.announcer.cancel();
            return;
        }

        self.has_focus = true;
        match direction {
            Some(FocusDirection::Forward) => {
                self.move_focus(i64::MIN);
            }
            Some(FocusDirection::Backward) => {
                self.move_focus(i64::MAX);
            }
            Some(FocusDirection::Left) => {
                self.move_focus_in_absolute_direction(i64::MAX);
            }
            Some(FocusDirection::Right) => {
                self.move_focus_in_absolute_direction(i64::MIN);
            }
            Some(FocusDirection::Up | FocusDirection::Down) | None => {}
        }
        debug!(focused_index = self.focused_index, "slider gained focus");
    }

    fn on_key_down_without_active_thumb(&mut self, key: SliderKey) -> bool {
        match key {
            SliderKey::Tab => self.move_focus(1),
            SliderKey::BackTab => self.move_focus(-1),
            SliderKey::Left => {
                self.move_focus_in_absolute_direction(-1);
                true
            }
            SliderKey::Right => {
                self.move_focus_in_absolute_direction(1);
                true
            }
            SliderKey::Minus => {
                self.move_focus(-1);
                true
            }
            SliderKey::Plus => {
                self.move_focus(1);
                true
            }
            SliderKey::Enter => {
                self.active_index = Some(self.focused_index);
                self.phase = InteractionPhase::KeyboardActive;
                true
            }
        }
    }

    fn increment_for_key(&self, key: SliderKey) -> Option<f32> {
        let increment = self.key_increment();
        let rtl = self.geometry.is_rtl();
        match key {
            SliderKey::Left if rtl => Some(increment),
            SliderKey::Left => Some(-increment),
            SliderKey::Right if rtl => Some(-increment),
            SliderKey::Right => Some(increment),
            SliderKey::Minus => Some(-increment),
            SliderKey::Plus => Some(increment),
            SliderKey::Tab | SliderKey::BackTab | SliderKey::Enter => None,
        }
    }

    /// Moves focus by `direction` thumbs in value order, clamped to the
    /// first and last thumb. A captured thumb follows focus.
    fn move_focus(&mut self, direction: i64) -> bool {
        let last = self.values.len().saturating_sub(1) as i64;
        let target = (self.focused_index as i64)
            .saturating_add(direction)
            .clamp(0, last) as usize;
        if target == self.focused_index {
            return false;
        }
        self.focused_index = target;
        if self.active_index.is_some() {
            self.active_index = Some(target);
        }
        true
    }

    /// Moves focus by `direction` thumbs on screen, positive meaning right.
    fn move_focus_in_absolute_direction(&mut self, direction: i64) -> bool {
        let direction = if self.geometry.is_rtl() {
            direction.saturating_neg()
        } else {
            direction
        };
        self.move_focus(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mapping::LayoutDirection,
        slider::{
            TouchEvent, TouchTracking,
            tests::{Observed, record, slider, user_change},
        },
    };

    fn press(slider: &mut Slider, key: SliderKey) -> bool {
        slider.on_key_down(KeyEvent::new(key)).unwrap()
    }

    #[test]
    fn single_thumb_is_always_keyboard_active() {
        let mut slider = slider(0.0, 10.0, 1.0, &[5.0]);
        let log = record(&mut slider);

        assert!(press(&mut slider, SliderKey::Right));
        assert!(press(&mut slider, SliderKey::Plus));
        assert!(press(&mut slider, SliderKey::Minus));
        assert_eq!(slider.values(), &[6.0]);
        assert_eq!(slider.phase(), InteractionPhase::KeyboardActive);
        assert_eq!(
            *log.lock(),
            vec![user_change(0, 6.0), user_change(0, 7.0), user_change(0, 6.0)]
        );
    }

    #[test]
    fn keys_stop_at_the_range_bounds() {
        let mut slider = slider(0.0, 10.0, 1.0, &[10.0]);
        let log = record(&mut slider);
        assert!(press(&mut slider, SliderKey::Right));
        assert_eq!(slider.values(), &[10.0]);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn rtl_swaps_arrow_directions() {
        let mut slider = slider(0.0, 10.0, 1.0, &[5.0]);
        slider.set_direction(LayoutDirection::RightToLeft);
        press(&mut slider, SliderKey::Left);
        assert_eq!(slider.values(), &[6.0]);
        press(&mut slider, SliderKey::Right);
        press(&mut slider, SliderKey::Right);
        assert_eq!(slider.values(), &[4.0]);
    }

    #[test]
    fn long_press_accelerates_until_key_up() {
        let mut slider = slider(0.0, 100.0, 1.0, &[50.0]);
        slider
            .on_key_down(KeyEvent::long_press(SliderKey::Right))
            .unwrap();
        assert_eq!(slider.values(), &[55.0]);
        // Repeats keep accelerating even without the flag.
        press(&mut slider, SliderKey::Right);
        assert_eq!(slider.values(), &[60.0]);

        slider.on_key_up(SliderKey::Right);
        press(&mut slider, SliderKey::Right);
        assert_eq!(slider.values(), &[61.0]);
    }

    #[test]
    fn focus_moves_between_thumbs_until_enter_captures() {
        let mut slider = slider(0.0, 10.0, 1.0, &[2.0, 5.0, 8.0]);

        assert!(press(&mut slider, SliderKey::Tab));
        assert_eq!(slider.focused_index(), 1);
        assert!(press(&mut slider, SliderKey::Right));
        assert_eq!(slider.focused_index(), 2);
        // Tab past the last thumb leaves the slider.
        assert!(!press(&mut slider, SliderKey::Tab));
        assert!(press(&mut slider, SliderKey::Minus));
        assert_eq!(slider.focused_index(), 1);
        assert_eq!(slider.values(), &[2.0, 5.0, 8.0]);

        assert!(press(&mut slider, SliderKey::Enter));
        assert_eq!(slider.active_index(), Some(1));
        press(&mut slider, SliderKey::Plus);
        assert_eq!(slider.values(), &[2.0, 6.0, 8.0]);

        // Tab carries the capture along.
        assert!(press(&mut slider, SliderKey::BackTab));
        assert_eq!(slider.active_index(), Some(0));
        press(&mut slider, SliderKey::Minus);
        assert_eq!(slider.values(), &[1.0, 6.0, 8.0]);

        assert!(press(&mut slider, SliderKey::Enter));
        assert_eq!(slider.active_index(), None);
        assert_eq!(slider.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn rtl_arrows_move_focus_on_screen() {
        let mut slider = slider(0.0, 10.0, 1.0, &[2.0, 8.0]);
        slider.set_direction(LayoutDirection::RightToLeft);
        press(&mut slider, SliderKey::Left);
        assert_eq!(slider.focused_index(), 1);
        press(&mut slider, SliderKey::Right);
        assert_eq!(slider.focused_index(), 0);
    }

    #[test]
    fn focus_gained_picks_the_thumb_on_the_entry_side() {
        let mut slider = slider(0.0, 10.0, 1.0, &[2.0, 5.0, 8.0]);
        slider.on_focus_changed(true, Some(FocusDirection::Backward));
        assert_eq!(slider.focused_index(), 2);
        slider.on_focus_changed(true, Some(FocusDirection::Forward));
        assert_eq!(slider.focused_index(), 0);
        slider.on_focus_changed(true, Some(FocusDirection::Left));
        assert_eq!(slider.focused_index(), 2);
        slider.on_focus_changed(true, Some(FocusDirection::Right));
        assert_eq!(slider.focused_index(), 0);

        slider.set_direction(LayoutDirection::RightToLeft);
        slider.on_focus_changed(true, Some(FocusDirection::Left));
        assert_eq!(slider.focused_index(), 0);
        slider.on_focus_changed(true, Some(FocusDirection::Right));
        assert_eq!(slider.focused_index(), 2);
        assert!(slider.has_focus());
    }

    #[test]
    fn focus_loss_ends_a_drag_and_keeps_the_focused_thumb() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0, 80.0]);
        let log = record(&mut slider);

        slider
            .on_touch_event(TouchEvent::down(75.0, 0.0))
            .unwrap();
        assert_eq!(slider.focused_index(), 1);
        slider.on_focus_changed(false, None);

        assert_eq!(slider.active_index(), None);
        assert_eq!(slider.phase(), InteractionPhase::Idle);
        assert_eq!(slider.focused_index(), 1);
        assert!(!slider.has_focus());
        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(1, 75.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn keys_do_not_interrupt_a_touch_drag() {
        let mut slider = slider(0.0, 100.0, 0.0, &[20.0]);
        let log = record(&mut slider);

        slider.on_touch_event(TouchEvent::down(20.0, 0.0)).unwrap();
        slider.on_touch_event(TouchEvent::moved(40.0, 0.0)).unwrap();
        assert!(!press(&mut slider, SliderKey::Right));
        assert_eq!(slider.phase(), InteractionPhase::Dragging);
        assert_eq!(slider.values(), &[40.0]);

        assert!(slider.on_touch_event(TouchEvent::up(40.0, 0.0)).unwrap());
        assert_eq!(
            *log.lock(),
            vec![
                Observed::Touch(TouchTracking::Started),
                user_change(0, 40.0),
                Observed::Touch(TouchTracking::Stopped),
            ]
        );
    }

    #[test]
    fn keys_stop_at_the_neighbour_separation() {
        let mut slider = slider(0.0, 100.0, 0.0, &[38.0, 50.0]);
        slider.set_min_separation_value(10.0);
        let log = record(&mut slider);

        assert!(press(&mut slider, SliderKey::Enter));
        for _ in 0..4 {
            assert!(press(&mut slider, SliderKey::Plus));
        }
        assert_eq!(slider.values(), &[40.0, 50.0]);
        assert_eq!(
            *log.lock(),
            vec![user_change(0, 39.0), user_change(0, 40.0)]
        );
    }

    #[test]
    fn disabled_slider_ignores_keys() {
        let mut slider = slider(0.0, 10.0, 1.0, &[5.0]);
        slider.set_enabled(false);
        assert!(!press(&mut slider, SliderKey::Right));
        assert_eq!(slider.values(), &[5.0]);
    }
}
