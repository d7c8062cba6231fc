//! Configuration errors and precision warnings raised by the slider.
//!
//! Only static configuration can be invalid. Touch and keyboard input is
//! always clamped into range and never produces an error.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = ConfigurationError> = std::result::Result<T, E>;

/// An invalid slider configuration.
///
/// Validation is lazy: setters only mark the configuration dirty, and the
/// error surfaces on the first read, draw or input event that depends on the
/// bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// `set_values` was called with an empty sequence.
    #[error("At least one value must be set")]
    EmptyValues,
    /// `value_from` is not strictly smaller than `value_to`.
    #[error("valueFrom({value_from}) must be smaller than valueTo({value_to})")]
    InvalidRange { value_from: f32, value_to: f32 },
    /// A thumb value lies outside `[value_from, value_to]` or is not finite.
    #[error(
        "Slider value({value}) must be greater or equal to valueFrom({value_from}), and lower or equal to valueTo({value_to})"
    )]
    ValueOutOfRange {
        value: f32,
        value_from: f32,
        value_to: f32,
    },
    /// The step size is negative, or does not evenly divide the range.
    #[error(
        "The stepSize({step_size}) must be 0, or a factor of the valueFrom({value_from})-valueTo({value_to}) range"
    )]
    InvalidStepSize {
        step_size: f32,
        value_from: f32,
        value_to: f32,
    },
    /// A thumb value does not land on a step boundary.
    #[error(
        "Value({value}) must be equal to valueFrom({value_from}) plus a multiple of stepSize({step_size}) when using stepSize({step_size})"
    )]
    ValueNotOnStep {
        value: f32,
        value_from: f32,
        step_size: f32,
    },
    /// An explicit focus request named a thumb that does not exist.
    #[error("Focus index {index} is out of range for {len} thumb(s)")]
    FocusIndexOutOfRange { index: usize, len: usize },
    /// A thumb index passed by the host does not exist.
    #[error("Thumb index {index} is out of range for {len} thumb(s)")]
    ThumbIndexOutOfRange { index: usize, len: usize },
}

/// The configuration field a [`PrecisionWarning`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionField {
    StepSize,
    ValueFrom,
    ValueTo,
}

impl fmt::Display for PrecisionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrecisionField::StepSize => "stepSize",
            PrecisionField::ValueFrom => "valueFrom",
            PrecisionField::ValueTo => "valueTo",
        };
        f.write_str(name)
    }
}

/// Advisory notice that a non-integer bound is combined with stepping.
///
/// Floating point configuration is legal, so this is only logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionWarning {
    pub field: PrecisionField,
    pub value: f32,
}

impl fmt::Display for PrecisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Floating point value used for {}({}). Using floats can have rounding errors which may \
             result in incorrect values. Instead, consider using integers with a custom label \
             formatter to display the value correctly.",
            self.field, self.value
        )
    }
}
