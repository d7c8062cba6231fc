//! Step quantization in normalized track space.
//!
//! Snapping happens on the `0.0..=1.0` proportion of the track rather than on
//! absolute values, so rounding does not depend on the magnitude of the
//! range.

/// Number of whole steps between `value_from` and `value_to`.
///
/// Returns `None` for a continuous slider (`step_size == 0`) or when the step
/// is wider than the range.
pub fn step_count(value_from: f32, value_to: f32, step_size: f32) -> Option<u32> {
    if step_size <= 0.0 {
        return None;
    }
    let count = ((value_to - value_from) / step_size).floor();
    if !count.is_finite() || count < 1.0 {
        return None;
    }
    Some(count.min(u32::MAX as f32) as u32)
}

/// Snaps a normalized position to the nearest of `step_count` steps.
///
/// A `None` step count leaves the position untouched.
pub fn snap_position(position: f32, step_count: Option<u32>) -> f64 {
    match step_count {
        Some(count) => {
            let count = f64::from(count);
            (f64::from(position) * count).round() / count
        }
        None => f64::from(position),
    }
}
