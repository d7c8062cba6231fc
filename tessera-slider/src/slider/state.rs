//! Saving and restoring slider state across host re-creation.

use super::Slider;
use crate::{
    error::Result,
    separation::{SeparationPolicy, SeparationUnit},
};

/// Persistable configuration and values of a [`Slider`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedSliderState {
    pub value_from: f32,
    pub value_to: f32,
    pub values: Vec<f32>,
    pub step_size: f32,
    pub min_separation: f32,
    pub separation_unit: SeparationUnit,
    pub has_focus: bool,
}

impl Slider {
    pub fn save_state(&self) -> SavedSliderState {
        SavedSliderState {
            value_from: self.values.value_from(),
            value_to: self.values.value_to(),
            values: self.values.values().to_vec(),
            step_size: self.values.step_size(),
            min_separation: self.separation.min_separation,
            separation_unit: self.separation.unit,
            has_focus: self.has_focus,
        }
    }

    /// Restores a previously saved state.
    ///
    /// Change listeners observe every restored value once as a programmatic
    /// change. Focus returns to the first thumb and a gesture in progress
    /// ends.
    pub fn restore_state(&mut self, state: SavedSliderState) -> Result<()> {
        self.stop_tracking();
        self.gesture = super::GestureState::default();
        self.values.set_value_from(state.value_from);
        self.values.set_value_to(state.value_to);
        self.values.set_step_size(state.step_size)?;
        self.values.set_values(state.values)?;
        self.separation = SeparationPolicy {
            min_separation: state.min_separation,
            unit: state.separation_unit,
        };
        self.focused_index = 0;
        self.active_index = None;
        self.phase = super::InteractionPhase::Idle;
        self.has_focus = state.has_focus;
        self.values.validate()?;
        self.dispatch_changed_programmatically();
        Ok(())
    }
}
