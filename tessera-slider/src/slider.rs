//! The slider engine: one or more thumbs on a bounded track.
//!
//! ## Usage
//!
//! Configure a [`Slider`] from [`SliderArgs`], give it a width once layout is
//! known, then feed it pointer and key events. Listeners observe every
//! committed value change and the start/end of each touch gesture.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use tessera_slider::{Slider, SliderArgs, TouchEvent};
//!
//! let mut slider = Slider::new(
//!     SliderArgs::default()
//!         .value_from(0.0)
//!         .value_to(100.0)
//!         .values([20.0, 80.0])
//!         .min_separation_value(10.0),
//! )
//! .unwrap();
//! slider.set_width(100.0);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! slider.add_on_change_listener(move |change| sink.lock().unwrap().push(change.value));
//!
//! slider.on_touch_event(TouchEvent::down(25.0, 0.0)).unwrap();
//! slider.on_touch_event(TouchEvent::up(25.0, 0.0)).unwrap();
//! assert_eq!(slider.values(), &[25.0, 80.0]);
//! assert_eq!(*seen.lock().unwrap(), vec![25.0]);
//! ```

use std::sync::Arc;

use derive_setters::Setters;
use tracing::debug;

use crate::{
    error::{ConfigurationError, Result},
    mapping::{CoordinateMapper, LayoutDirection, TrackGeometry},
    quantize::{snap_position, step_count},
    separation::{SeparationPolicy, SeparationUnit, clamped_value, effective_separation},
    thumb_picker,
    value_set::{THRESHOLD, ValueSet},
};

pub use accessibility::{ANNOUNCEMENT_DELAY, AnnouncementScheduler};
pub use interaction::{InteractionPhase, TouchAction, TouchEvent};
pub use keyboard::{FocusDirection, KeyEvent, SliderKey};
pub use render::{Halo, SliderSnapshot, ThumbMark, ThumbMetrics, Tick};
pub use state::SavedSliderState;

use interaction::GestureState;

mod accessibility;
mod interaction;
mod keyboard;
mod render;
mod state;

/// Touch slop used when the host does not provide one, in pixels.
pub const DEFAULT_TOUCH_SLOP: f32 = 8.0;
/// Increment multiplier applied while a key is long-pressed.
const LONG_PRESS_STEP_FACTOR: u32 = 20;

/// A committed change of one thumb value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueChange {
    /// Index of the thumb that changed.
    pub index: usize,
    /// The thumb's new value.
    pub value: f32,
    /// `true` for touch, key and accessibility input, `false` for values set
    /// through the API or restored from saved state.
    pub from_user: bool,
}

/// Lifecycle of a touch gesture that tracks a thumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchTracking {
    Started,
    Stopped,
}

/// Handle returned when registering a listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<E> = Arc<dyn Fn(E) + Send + Sync>;

/// Listeners of one event type, invoked in registration order.
struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Handler<E>)>,
}

impl<E: Copy> Listeners<E> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, handler: Handler<E>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, handler));
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dispatch(&self, event: E) {
        for (_, handler) in &self.entries {
            handler(event);
        }
    }
}

/// Arguments for building a [`Slider`].
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct SliderArgs {
    /// Lower bound of the value range.
    pub value_from: f32,
    /// Upper bound of the value range.
    pub value_to: f32,
    /// Quantization step, `0.0` for a continuous slider.
    pub step_size: f32,
    /// Initial thumb values, one per thumb. Sorted on assignment.
    #[setters(skip)]
    pub values: Vec<f32>,
    /// Minimum gap between adjacent thumbs, only used without stepping.
    pub min_separation: f32,
    /// Unit of `min_separation`.
    pub separation_unit: SeparationUnit,
    /// Pointer movement, in pixels, before a touch counts as a drag.
    pub touch_slop: f32,
    /// Distance between the widget edge and the track, in pixels.
    pub track_side_padding: f32,
    /// Layout direction of the track.
    pub direction: LayoutDirection,
    /// Disabled sliders ignore touch, key and accessibility input.
    pub enabled: bool,
    /// Whether user changes schedule an accessibility announcement.
    pub accessibility_enabled: bool,
}

impl Default for SliderArgs {
    fn default() -> Self {
        Self {
            value_from: 0.0,
            value_to: 1.0,
            step_size: 0.0,
            values: vec![0.0],
            min_separation: 0.0,
            separation_unit: SeparationUnit::Pixels,
            touch_slop: DEFAULT_TOUCH_SLOP,
            track_side_padding: 0.0,
            direction: LayoutDirection::LeftToRight,
            enabled: true,
            accessibility_enabled: true,
        }
    }
}

impl SliderArgs {
    /// Sets the initial thumb values.
    pub fn values(mut self, values: impl IntoIterator<Item = f32>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    /// Sets a minimum separation in value units.
    pub fn min_separation_value(mut self, min_separation: f32) -> Self {
        self.min_separation = min_separation;
        self.separation_unit = SeparationUnit::Value;
        self
    }
}

/// Slider engine owning the thumb values, focus and the interaction state.
///
/// All input is processed synchronously, in delivery order, on the thread
/// that owns the slider.
pub struct Slider {
    values: ValueSet,
    separation: SeparationPolicy,
    width: f32,
    track_side_padding: f32,
    geometry: TrackGeometry,
    touch_slop: f32,
    enabled: bool,
    in_scrolling_container: bool,
    accessibility_enabled: bool,
    has_focus: bool,
    focused_index: usize,
    active_index: Option<usize>,
    phase: InteractionPhase,
    gesture: GestureState,
    long_press: bool,
    change_listeners: Listeners<ValueChange>,
    touch_listeners: Listeners<TouchTracking>,
    announcer: AnnouncementScheduler,
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("values", &self.values)
            .field("separation", &self.separation)
            .field("geometry", &self.geometry)
            .field("focused_index", &self.focused_index)
            .field("active_index", &self.active_index)
            .field("phase", &self.phase)
            .field("change_listeners", &self.change_listeners.len())
            .field("touch_listeners", &self.touch_listeners.len())
            .finish_non_exhaustive()
    }
}

impl Slider {
    /// Creates a slider from `args`.
    ///
    /// Only an empty value list or a negative step fail here; range and step
    /// consistency is checked lazily on first use.
    pub fn new(args: SliderArgs) -> Result<Self> {
        let mut values = ValueSet::new(args.value_from, args.value_to);
        values.set_step_size(args.step_size)?;
        values.set_values(args.values)?;
        let geometry = TrackGeometry::for_width(0.0, args.track_side_padding, args.direction);
        Ok(Self {
            values,
            separation: SeparationPolicy {
                min_separation: args.min_separation,
                unit: args.separation_unit,
            },
            width: 0.0,
            track_side_padding: args.track_side_padding,
            geometry,
            touch_slop: args.touch_slop,
            enabled: args.enabled,
            in_scrolling_container: false,
            accessibility_enabled: args.accessibility_enabled,
            has_focus: false,
            focused_index: 0,
            active_index: None,
            phase: InteractionPhase::Idle,
            gesture: GestureState::default(),
            long_press: false,
            change_listeners: Listeners::new(),
            touch_listeners: Listeners::new(),
            announcer: AnnouncementScheduler::default(),
        })
    }

    /// Validates the configuration if it changed since the last check.
    pub fn validate(&mut self) -> Result<()> {
        self.values.validate()
    }

    pub fn value_from(&self) -> f32 {
        self.values.value_from()
    }

    pub fn set_value_from(&mut self, value_from: f32) {
        self.values.set_value_from(value_from);
    }

    pub fn value_to(&self) -> f32 {
        self.values.value_to()
    }

    pub fn set_value_to(&mut self, value_to: f32) {
        self.values.set_value_to(value_to);
    }

    pub fn step_size(&self) -> f32 {
        self.values.step_size()
    }

    pub fn set_step_size(&mut self, step_size: f32) -> Result<()> {
        self.values.set_step_size(step_size)
    }

    /// Current thumb values in ascending order.
    pub fn values(&self) -> &[f32] {
        self.values.values()
    }

    /// Replaces all thumb values.
    ///
    /// Focus returns to the first thumb and every change listener observes
    /// each new value as a programmatic change. Setting the same values
    /// again is a no-op.
    pub fn set_values(&mut self, values: impl IntoIterator<Item = f32>) -> Result<()> {
        let previous_len = self.values.len();
        if !self.values.set_values(values)? {
            return Ok(());
        }
        if self.values.len() != previous_len {
            self.active_index = None;
        }
        self.focused_index = 0;
        self.dispatch_changed_programmatically();
        Ok(())
    }

    pub fn min_separation(&self) -> f32 {
        self.separation.min_separation
    }

    pub fn separation_unit(&self) -> SeparationUnit {
        self.separation.unit
    }

    /// Sets the minimum thumb separation in track pixels.
    pub fn set_min_separation(&mut self, min_separation: f32) {
        self.separation = SeparationPolicy::pixels(min_separation);
    }

    /// Sets the minimum thumb separation in value units.
    pub fn set_min_separation_value(&mut self, min_separation: f32) {
        self.separation = SeparationPolicy::value(min_separation);
    }

    pub fn focused_index(&self) -> usize {
        self.focused_index
    }

    pub fn set_focused_index(&mut self, index: usize) -> Result<()> {
        let len = self.values.len();
        if index >= len {
            return Err(ConfigurationError::FocusIndexOutOfRange { index, len });
        }
        self.focused_index = index;
        Ok(())
    }

    /// Thumb captured by the current gesture or keyboard interaction.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Whether a thumb is pressed by an ongoing touch gesture.
    pub fn is_pressed(&self) -> bool {
        self.gesture.pressed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_tracking();
            self.active_index = None;
            self.phase = InteractionPhase::Idle;
            self.gesture = GestureState::default();
            self.announcer.cancel();
        }
    }

    /// Marks the slider as living inside a scrolling container, where a
    /// touch down must not capture a thumb before the gesture is a drag.
    pub fn set_in_scrolling_container(&mut self, in_scrolling_container: bool) {
        self.in_scrolling_container = in_scrolling_container;
    }

    pub fn set_accessibility_enabled(&mut self, enabled: bool) {
        self.accessibility_enabled = enabled;
        if !enabled {
            self.announcer.cancel();
        }
    }

    pub fn touch_slop(&self) -> f32 {
        self.touch_slop
    }

    pub fn set_touch_slop(&mut self, touch_slop: f32) {
        self.touch_slop = touch_slop;
    }

    pub fn geometry(&self) -> TrackGeometry {
        self.geometry
    }

    /// Updates the widget width after layout.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.update_geometry();
    }

    pub fn track_side_padding(&self) -> f32 {
        self.track_side_padding
    }

    pub fn set_track_side_padding(&mut self, padding: f32) {
        self.track_side_padding = padding;
        self.update_geometry();
    }

    pub fn direction(&self) -> LayoutDirection {
        self.geometry.direction
    }

    pub fn set_direction(&mut self, direction: LayoutDirection) {
        self.geometry.direction = direction;
        self.update_geometry();
    }

    fn update_geometry(&mut self) {
        self.geometry =
            TrackGeometry::for_width(self.width, self.track_side_padding, self.geometry.direction);
        debug!(
            track_width = self.geometry.track_width,
            side_padding = self.geometry.side_padding,
            rtl = self.geometry.is_rtl(),
            "slider track geometry updated"
        );
    }

    /// Registers a listener for committed value changes.
    pub fn add_on_change_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(ValueChange) + Send + Sync + 'static,
    {
        self.change_listeners.add(Arc::new(listener))
    }

    pub fn remove_on_change_listener(&mut self, id: ListenerId) -> bool {
        self.change_listeners.remove(id)
    }

    pub fn clear_on_change_listeners(&mut self) {
        self.change_listeners.clear();
    }

    /// Registers a listener for the start and end of touch tracking.
    pub fn add_on_touch_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(TouchTracking) + Send + Sync + 'static,
    {
        self.touch_listeners.add(Arc::new(listener))
    }

    pub fn remove_on_touch_listener(&mut self, id: ListenerId) -> bool {
        self.touch_listeners.remove(id)
    }

    pub fn clear_on_touch_listeners(&mut self) {
        self.touch_listeners.clear();
    }

    pub(crate) fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.values.value_from(), self.values.value_to(), self.geometry)
    }

    fn effective_separation(&self) -> f32 {
        effective_separation(self.separation, self.values.step_size(), &self.mapper())
    }

    fn step_count(&self) -> Option<u32> {
        step_count(
            self.values.value_from(),
            self.values.value_to(),
            self.values.step_size(),
        )
    }

    /// Step increment for key and accessibility input.
    ///
    /// One step, or `1.0` for a continuous slider.
    pub fn calculate_step_increment(&self) -> f32 {
        let step_size = self.values.step_size();
        if step_size == 0.0 { 1.0 } else { step_size }
    }

    /// Accelerated increment covering roughly `1 / factor` of the range.
    ///
    /// Ranges with no more than `factor` steps use the plain increment.
    pub fn calculate_step_increment_by(&self, factor: u32) -> f32 {
        let increment = self.calculate_step_increment();
        let steps = (self.values.value_to() - self.values.value_from()) / increment;
        if steps <= factor as f32 {
            return increment;
        }
        (steps / factor as f32).round() * increment
    }

    fn key_increment(&self) -> f32 {
        if self.long_press {
            self.calculate_step_increment_by(LONG_PRESS_STEP_FACTOR)
        } else {
            self.calculate_step_increment()
        }
    }

    /// Value under the current touch position, snapped to the step grid.
    fn value_of_touch_position(&self) -> f32 {
        let position = snap_position(self.gesture.touch_position, self.step_count());
        self.mapper().normalized_to_value_f64(position)
    }

    /// Snaps an arbitrary value onto the step grid.
    fn snap_value(&self, value: f32) -> f32 {
        let Some(count) = self.step_count() else {
            return value;
        };
        let mapper = self.mapper();
        let position = mapper.value_to_normalized(value);
        mapper.normalized_to_value_f64(snap_position(position, Some(count)))
    }

    fn pick_active_thumb(&mut self) -> Option<usize> {
        self.active_index = thumb_picker::pick_active_thumb(
            self.active_index,
            self.values.values(),
            self.gesture.touch_position,
            &self.mapper(),
            self.touch_slop,
        );
        self.active_index
    }

    fn snap_touch_position(&mut self) -> bool {
        match self.active_index {
            Some(index) => {
                let value = self.value_of_touch_position();
                self.snap_thumb_to_value(index, value)
            }
            None => false,
        }
    }

    /// Moves thumb `index` towards `value`, clamped between its neighbours.
    ///
    /// Returns `true` and notifies listeners only when the stored value
    /// changed.
    fn snap_thumb_to_value(&mut self, index: usize, value: f32) -> bool {
        let Some(current) = self.values.get(index) else {
            return false;
        };
        if (value - current).abs() < THRESHOLD {
            return false;
        }
        let clamped = clamped_value(
            index,
            value,
            self.values.values(),
            self.effective_separation(),
            self.values.value_from(),
            self.values.value_to(),
        );
        if !self.values.set_value_at(index, clamped) {
            return false;
        }
        self.focused_index = index;
        self.dispatch_changed_from_user(index);
        true
    }

    fn dispatch_changed_programmatically(&mut self) {
        for (_, listener) in &self.change_listeners.entries {
            for (index, &value) in self.values.values().iter().enumerate() {
                listener(ValueChange {
                    index,
                    value,
                    from_user: false,
                });
            }
        }
    }

    fn dispatch_changed_from_user(&mut self, index: usize) {
        let Some(value) = self.values.get(index) else {
            return;
        };
        self.change_listeners.dispatch(ValueChange {
            index,
            value,
            from_user: true,
        });
        if self.accessibility_enabled {
            self.announcer.schedule(index, std::time::Instant::now());
        }
    }

    fn start_tracking(&mut self) {
        if !self.gesture.tracking {
            self.gesture.tracking = true;
            self.touch_listeners.dispatch(TouchTracking::Started);
        }
    }

    fn stop_tracking(&mut self) {
        if self.gesture.tracking {
            self.gesture.tracking = false;
            self.touch_listeners.dispatch(TouchTracking::Stopped);
        }
    }
}
