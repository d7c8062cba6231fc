//! Accessibility projection of the thumbs and deferred value announcements.
//!
//! Every thumb is exposed as its own [`accesskit::Role::Slider`] node. User
//! changes schedule an announcement through [`AnnouncementScheduler`], which
//! coalesces bursts so a drag produces a single announcement once the thumb
//! has settled.

use std::time::{Duration, Instant};

use accesskit::{Action, ActionData, Node, Rect, Role};
use tracing::debug;

use super::{LONG_PRESS_STEP_FACTOR, Slider, ThumbMetrics};
use crate::error::{ConfigurationError, Result};

/// Delay between the last user change and its announcement.
pub const ANNOUNCEMENT_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAnnouncement {
    thumb: usize,
    due: Instant,
}

/// Debounces announcements of thumb value changes.
///
/// Scheduling replaces any pending announcement and restarts the delay.
#[derive(Debug, Clone)]
pub struct AnnouncementScheduler {
    delay: Duration,
    pending: Option<PendingAnnouncement>,
}

impl Default for AnnouncementScheduler {
    fn default() -> Self {
        Self::new(ANNOUNCEMENT_DELAY)
    }
}

impl AnnouncementScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules an announcement for `thumb`, dropping the pending one.
    pub fn schedule(&mut self, thumb: usize, now: Instant) {
        self.pending = Some(PendingAnnouncement {
            thumb,
            due: now + self.delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the thumb to announce once the delay has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.thumb)
            }
            _ => None,
        }
    }
}

impl Slider {
    /// Returns the thumb whose value should be announced at `now`, if any.
    pub fn poll_accessibility_announcement(&mut self, now: Instant) -> Option<usize> {
        let thumb = self.announcer.poll(now)?;
        debug!(thumb, "announcing slider value");
        Some(thumb)
    }

    /// Whether an announcement is waiting for its delay to elapse.
    pub fn has_pending_announcement(&self) -> bool {
        self.announcer.is_pending()
    }

    /// Screen bounds of thumb `index`, a square around the thumb center.
    pub fn thumb_bounds(&self, index: usize, metrics: &ThumbMetrics) -> Option<Rect> {
        let value = self.values.get(index)?;
        let center_x = f64::from(self.mapper().value_to_pixel(value));
        let center_y = f64::from(metrics.track_center_y);
        let radius = f64::from(metrics.thumb_radius);
        Some(Rect {
            x0: center_x - radius,
            y0: center_y - radius,
            x1: center_x + radius,
            y1: center_y + radius,
        })
    }

    /// Thumb whose bounds contain the point, if any.
    pub fn virtual_view_at(&self, x: f32, y: f32, metrics: &ThumbMetrics) -> Option<usize> {
        let (x, y) = (f64::from(x), f64::from(y));
        (0..self.values.len()).find(|&index| {
            self.thumb_bounds(index, metrics).is_some_and(|bounds| {
                x >= bounds.x0 && x < bounds.x1 && y >= bounds.y0 && y < bounds.y1
            })
        })
    }

    /// Builds one accessibility node per thumb, in value order.
    pub fn accessibility_nodes(&mut self, metrics: &ThumbMetrics) -> Result<Vec<Node>> {
        self.values.validate()?;
        let value_from = self.values.value_from();
        let value_to = self.values.value_to();
        let step_size = self.values.step_size();

        let nodes = self
            .values
            .values()
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let mut node = Node::new(Role::Slider);
                node.set_numeric_value(f64::from(value));
                node.set_min_numeric_value(f64::from(value_from));
                node.set_max_numeric_value(f64::from(value_to));
                if step_size > 0.0 {
                    node.set_numeric_value_step(f64::from(step_size));
                }
                if self.values.len() > 1 {
                    node.set_label(format!("Thumb {} of {}", index + 1, self.values.len()));
                }
                if let Some(bounds) = self.thumb_bounds(index, metrics) {
                    node.set_bounds(bounds);
                }
                if self.enabled {
                    node.add_action(Action::Focus);
                    node.add_action(Action::SetValue);
                    if value > value_from {
                        node.add_action(Action::Decrement);
                    }
                    if value < value_to {
                        node.add_action(Action::Increment);
                    }
                } else {
                    node.set_disabled();
                }
                node
            })
            .collect();
        Ok(nodes)
    }

    /// Applies an assistive technology action to thumb `index`.
    ///
    /// `SetValue` expects [`ActionData::NumericValue`] and snaps it onto the
    /// step grid. `Increment` and `Decrement` move by the accelerated step
    /// increment. Returns whether the thumb value changed.
    pub fn perform_accessibility_action(
        &mut self,
        index: usize,
        action: Action,
        data: Option<&ActionData>,
    ) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.values.validate()?;
        let Some(current) = self.values.get(index) else {
            return Err(ConfigurationError::ThumbIndexOutOfRange {
                index,
                len: self.values.len(),
            });
        };

        let increment = self.calculate_step_increment_by(LONG_PRESS_STEP_FACTOR);
        let target = match action {
            Action::SetValue => match data {
                Some(ActionData::NumericValue(value)) => self.snap_value(*value as f32),
                _ => return Ok(false),
            },
            Action::Increment => current + increment,
            Action::Decrement => current - increment,
            Action::Focus => {
                self.has_focus = true;
                self.focused_index = index;
                return Ok(false);
            }
            _ => return Ok(false),
        };
        let target = target.clamp(self.values.value_from(), self.values.value_to());
        Ok(self.snap_thumb_to_value(index, target))
    }
}
