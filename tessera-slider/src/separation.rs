//! Minimum gap enforcement between neighbouring thumbs.

use crate::mapping::CoordinateMapper;

/// Unit in which a minimum separation is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeparationUnit {
    /// Pixels along the track, converted using the current layout.
    #[default]
    Pixels,
    /// Units of the slider value.
    Value,
}

/// Minimum distance kept between adjacent thumbs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeparationPolicy {
    pub min_separation: f32,
    pub unit: SeparationUnit,
}

impl SeparationPolicy {
    pub const NONE: Self = Self {
        min_separation: 0.0,
        unit: SeparationUnit::Pixels,
    };

    pub fn pixels(min_separation: f32) -> Self {
        Self {
            min_separation,
            unit: SeparationUnit::Pixels,
        }
    }

    pub fn value(min_separation: f32) -> Self {
        Self {
            min_separation,
            unit: SeparationUnit::Value,
        }
    }
}

/// Separation in value units that applies with the current configuration.
///
/// Stepped sliders ignore the policy. Pixel separations go through the
/// mirrored track mapping, which yields a negative displacement for
/// right-to-left layouts; the sign is flipped back there so the gap always
/// keeps values ascending.
pub fn effective_separation(
    policy: SeparationPolicy,
    step_size: f32,
    mapper: &CoordinateMapper,
) -> f32 {
    if step_size > 0.0 {
        return 0.0;
    }
    match policy.unit {
        SeparationUnit::Value => policy.min_separation,
        SeparationUnit::Pixels => {
            let separation = mapper.pixel_length_to_value(policy.min_separation);
            if mapper.geometry.is_rtl() {
                -separation
            } else {
                separation
            }
        }
    }
}

/// Clamps `value` for thumb `index` between its neighbours.
///
/// The first thumb is bounded below by `value_from` and the last above by
/// `value_to`; every other bound is the neighbour offset by `separation`.
/// When the bounds cross, the lower bound wins.
pub fn clamped_value(
    index: usize,
    value: f32,
    values: &[f32],
    separation: f32,
    value_from: f32,
    value_to: f32,
) -> f32 {
    let lower = match index.checked_sub(1).and_then(|i| values.get(i)) {
        Some(previous) => previous + separation,
        None => value_from,
    };
    let upper = match values.get(index + 1) {
        Some(next) => next - separation,
        None => value_to,
    };

    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}
