//! The ordered set of thumb values and its configuration checks.
//!
//! [`ValueSet`] holds the thumb values together with the range and step size
//! they must respect. Mutating setters only mark the set dirty; the checks
//! run once on the next [`ValueSet::validate`] and are cached until the next
//! mutation, so a host can configure `value_from`, `value_to` and the values
//! in any order.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{ConfigurationError, PrecisionField, PrecisionWarning, Result};

/// Values closer than this are treated as equal.
pub const THRESHOLD: f32 = 1e-4;

/// Inline storage sized for the common one- and two-thumb sliders.
pub type Values = SmallVec<[f32; 2]>;

/// Thumb values of a slider plus the bounds they live in.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSet {
    values: Values,
    value_from: f32,
    value_to: f32,
    step_size: f32,
    dirty: bool,
}

impl Default for ValueSet {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl ValueSet {
    /// Creates a continuous set over `[value_from, value_to]` with a single
    /// thumb at `value_from`.
    pub fn new(value_from: f32, value_to: f32) -> Self {
        let mut values = Values::new();
        values.push(value_from);
        Self {
            values,
            value_from,
            value_to,
            step_size: 0.0,
            dirty: true,
        }
    }

    pub fn value_from(&self) -> f32 {
        self.value_from
    }

    pub fn set_value_from(&mut self, value_from: f32) {
        self.value_from = value_from;
        self.dirty = true;
    }

    pub fn value_to(&self) -> f32 {
        self.value_to
    }

    pub fn set_value_to(&mut self, value_to: f32) {
        self.value_to = value_to;
        self.dirty = true;
    }

    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    /// Sets the quantization step; `0.0` makes the slider continuous.
    ///
    /// A negative step is rejected right away since no later configuration
    /// could make it valid.
    pub fn set_step_size(&mut self, step_size: f32) -> Result<()> {
        if step_size < 0.0 {
            return Err(ConfigurationError::InvalidStepSize {
                step_size,
                value_from: self.value_from,
                value_to: self.value_to,
            });
        }
        if self.step_size != step_size {
            self.step_size = step_size;
            self.dirty = true;
        }
        Ok(())
    }

    /// Replaces every value, sorting them ascending.
    ///
    /// Returns `Ok(false)` when the sorted input equals the current values.
    pub fn set_values<I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values: Values = values.into_iter().collect();
        if values.is_empty() {
            return Err(ConfigurationError::EmptyValues);
        }
        values.sort_by(f32::total_cmp);
        if values == self.values {
            return Ok(false);
        }
        self.values = values;
        self.dirty = true;
        Ok(true)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Replaces the value at `index` without re-sorting.
    ///
    /// The caller keeps the set ordered by clamping through
    /// [`crate::separation::clamped_value`] first. Returns `true` only when
    /// the stored value moved by more than [`THRESHOLD`]; an out of range
    /// index is ignored and reported as unchanged.
    pub fn set_value_at(&mut self, index: usize, value: f32) -> bool {
        match self.values.get_mut(index) {
            Some(slot) if (*slot - value).abs() >= THRESHOLD => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Runs the configuration checks if anything changed since the last run.
    pub fn validate(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.check_range()?;
        self.check_step_size()?;
        self.check_values()?;
        for warning in self.precision_warnings() {
            warn!(field = %warning.field, value = warning.value, "{warning}");
        }
        debug!(
            value_from = self.value_from,
            value_to = self.value_to,
            step_size = self.step_size,
            thumbs = self.values.len(),
            "slider configuration validated"
        );
        self.dirty = false;
        Ok(())
    }

    /// Lists the bounds that are non-integer while stepping is enabled.
    pub fn precision_warnings(&self) -> SmallVec<[PrecisionWarning; 3]> {
        let mut warnings = SmallVec::new();
        if self.step_size == 0.0 {
            return warnings;
        }
        let fields = [
            (PrecisionField::StepSize, self.step_size),
            (PrecisionField::ValueFrom, self.value_from),
            (PrecisionField::ValueTo, self.value_to),
        ];
        for (field, value) in fields {
            if value.fract() != 0.0 {
                warnings.push(PrecisionWarning { field, value });
            }
        }
        warnings
    }

    fn check_range(&self) -> Result<()> {
        if !(self.value_from < self.value_to) {
            return Err(ConfigurationError::InvalidRange {
                value_from: self.value_from,
                value_to: self.value_to,
            });
        }
        Ok(())
    }

    fn check_step_size(&self) -> Result<()> {
        if self.step_size > 0.0
            && !value_lands_on_step(self.value_to, self.value_from, self.step_size)
        {
            return Err(ConfigurationError::InvalidStepSize {
                step_size: self.step_size,
                value_from: self.value_from,
                value_to: self.value_to,
            });
        }
        Ok(())
    }

    fn check_values(&self) -> Result<()> {
        for &value in &self.values {
            if !value.is_finite() || value < self.value_from || value > self.value_to {
                return Err(ConfigurationError::ValueOutOfRange {
                    value,
                    value_from: self.value_from,
                    value_to: self.value_to,
                });
            }
            if self.step_size > 0.0 && !value_lands_on_step(value, self.value_from, self.step_size)
            {
                return Err(ConfigurationError::ValueNotOnStep {
                    value,
                    value_from: self.value_from,
                    step_size: self.step_size,
                });
            }
        }
        Ok(())
    }
}

/// Returns whether `value` sits on a step boundary counted from `value_from`.
///
/// The quotient `(value - value_from) / step_size` is evaluated on the
/// shortest decimal spelling of each float, so `0.3` stepping by `0.1` is an
/// exact `3` rather than `2.9999998`. The value lands when that quotient is
/// within [`THRESHOLD`] of an integer.
pub fn value_lands_on_step(value: f32, value_from: f32, step_size: f32) -> bool {
    step_deviation(value, value_from, step_size) < f64::from(THRESHOLD)
}

/// Distance of `(value - value_from) / step_size` from the nearest integer.
fn step_deviation(value: f32, value_from: f32, step_size: f32) -> f64 {
    if let Some(deviation) = decimal_step_deviation(value, value_from, step_size) {
        return deviation;
    }
    // Out of the exact range: fall back to binary arithmetic.
    let quotient = (f64::from(value) - f64::from(value_from)) / f64::from(step_size);
    if !quotient.is_finite() {
        return f64::INFINITY;
    }
    (quotient.round() - quotient).abs()
}

fn decimal_step_deviation(value: f32, value_from: f32, step_size: f32) -> Option<f64> {
    let value = Decimal::from_f32(value)?;
    let from = Decimal::from_f32(value_from)?;
    let step = Decimal::from_f32(step_size)?;
    let scale = value.scale.max(from.scale).max(step.scale);

    let numerator = value.rescale(scale)?.checked_sub(from.rescale(scale)?)?;
    let denominator = step.rescale(scale)?.checked_abs()?;
    if denominator == 0 {
        return None;
    }
    let remainder = numerator.checked_rem(denominator)?.checked_abs()?;
    let nearest = remainder.min(denominator - remainder);
    Some(nearest as f64 / denominator as f64)
}

/// A float spelled as `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    fn from_f32(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // `Display` yields the shortest round-tripping spelling without an
        // exponent.
        let text = value.to_string();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let mut mantissa: i128 = 0;
        for byte in integer.bytes().chain(fraction.bytes()) {
            if !byte.is_ascii_digit() {
                return None;
            }
            mantissa = mantissa
                .checked_mul(10)?
                .checked_add(i128::from(byte - b'0'))?;
        }
        Some(Self {
            mantissa: if negative { -mantissa } else { mantissa },
            scale: u32::try_from(fraction.len()).ok()?,
        })
    }

    fn rescale(self, scale: u32) -> Option<i128> {
        let factor = 10_i128.checked_pow(scale.checked_sub(self.scale)?)?;
        self.mantissa.checked_mul(factor)
    }
}
