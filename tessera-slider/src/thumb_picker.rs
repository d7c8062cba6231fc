//! Resolution of the thumb a touch gesture should move.

use tracing::trace;

use crate::mapping::CoordinateMapper;

/// Two distances closer than this, relative to their size, tie.
const TIE_EPSILON: f32 = f32::EPSILON * 4.0;

fn distances_tie(a: f32, b: f32) -> bool {
    (a - b).abs() <= TIE_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Picks the thumb closest to `touch_position`.
///
/// `touch_position` is the normalized, unmirrored track position of the
/// pointer. An already captured thumb in `active` is returned unchanged, so a
/// gesture keeps its thumb once it has one.
///
/// Thumbs at the same distance are resolved as follows. If the later thumb
/// sits within `touch_slop` pixels of the touch, the touch cannot be
/// attributed yet and `None` is returned; the caller retries once the
/// pointer has moved. Otherwise the later thumb wins only when it lies
/// behind the touch in layout direction (left of it for left-to-right, right
/// of it for right-to-left).
pub fn pick_active_thumb(
    active: Option<usize>,
    values: &[f32],
    touch_position: f32,
    mapper: &CoordinateMapper,
    touch_slop: f32,
) -> Option<usize> {
    if active.is_some() {
        return active;
    }
    let (&first, rest) = values.split_first()?;

    let touch_value = mapper.normalized_to_value(touch_position);
    let touch_x = mapper.value_to_pixel(touch_value);
    let mut best = 0;
    let mut best_distance = (first - touch_value).abs();

    for (offset, &value) in rest.iter().enumerate() {
        let index = offset + 1;
        let distance = (value - touch_value).abs();
        if distance > best_distance && !distances_tie(distance, best_distance) {
            // Values are sorted, so every later thumb is further away.
            break;
        }

        if !distances_tie(distance, best_distance) {
            best = index;
            best_distance = distance;
            continue;
        }

        let value_x = mapper.value_to_pixel(value);
        if (value_x - touch_x).abs() < touch_slop {
            trace!(index, touch_value, "ambiguous touch between overlapping thumbs");
            return None;
        }
        let behind_touch = if mapper.geometry.is_rtl() {
            value_x > touch_x
        } else {
            value_x < touch_x
        };
        if behind_touch {
            best = index;
            best_distance = distance;
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{LayoutDirection, TrackGeometry};

    const SLOP: f32 = 8.0;

    fn mapper(from: f32, to: f32, direction: LayoutDirection) -> CoordinateMapper {
        CoordinateMapper::new(from, to, TrackGeometry::new(100.0, 0.0, direction))
    }

    #[test]
    fn captured_thumb_is_kept() {
        let mapper = mapper(0.0, 100.0, LayoutDirection::LeftToRight);
        assert_eq!(
            pick_active_thumb(Some(1), &[10.0, 90.0], 0.0, &mapper, SLOP),
            Some(1)
        );
    }

    #[test]
    fn closest_thumb_wins() {
        let mapper = mapper(0.0, 100.0, LayoutDirection::LeftToRight);
        let values = [10.0, 40.0, 90.0];
        assert_eq!(pick_active_thumb(None, &values, 0.05, &mapper, SLOP), Some(0));
        assert_eq!(pick_active_thumb(None, &values, 0.45, &mapper, SLOP), Some(1));
        assert_eq!(pick_active_thumb(None, &values, 0.80, &mapper, SLOP), Some(2));
    }

    #[test]
    fn midpoint_tie_is_deterministic() {
        let mapper = mapper(0.0, 100.0, LayoutDirection::LeftToRight);
        // 60px between the thumbs is well beyond the slop.
        assert_eq!(
            pick_active_thumb(None, &[20.0, 80.0], 0.5, &mapper, SLOP),
            Some(0)
        );
    }

    #[test]
    fn rtl_ties_follow_the_mirrored_direction() {
        let mapper = mapper(0.0, 100.0, LayoutDirection::RightToLeft);
        // Value 80 sits at pixel 20, left of the touch at 50.
        assert_eq!(
            pick_active_thumb(None, &[20.0, 80.0], 0.5, &mapper, SLOP),
            Some(0)
        );
        // Stacked thumbs at pixel 70. A touch left of them (higher values in
        // RTL) moves the upper thumb, a touch right of them the lower one.
        assert_eq!(
            pick_active_thumb(None, &[30.0, 30.0], 0.2, &mapper, SLOP),
            Some(1)
        );
        assert_eq!(
            pick_active_thumb(None, &[30.0, 30.0], 0.9, &mapper, SLOP),
            Some(0)
        );
    }

    #[test]
    fn stacked_thumbs_under_the_touch_are_ambiguous() {
        let mapper = mapper(0.0, 100.0, LayoutDirection::LeftToRight);
        assert_eq!(pick_active_thumb(None, &[50.0, 50.0], 0.52, &mapper, SLOP), None);
    }

    #[test]
    fn stacked_thumbs_resolve_by_touch_side() {
        let mapper = mapper(0.0, 100.0, LayoutDirection::LeftToRight);
        // Touch well left of the pair moves the lower thumb.
        assert_eq!(
            pick_active_thumb(None, &[50.0, 50.0], 0.2, &mapper, SLOP),
            Some(0)
        );
        // Touch well right of the pair moves the upper thumb.
        assert_eq!(
            pick_active_thumb(None, &[50.0, 50.0], 0.8, &mapper, SLOP),
            Some(1)
        );
    }

    #[test]
    fn empty_values_pick_nothing() {
        let mapper = mapper(0.0, 1.0, LayoutDirection::LeftToRight);
        assert_eq!(pick_active_thumb(None, &[], 0.5, &mapper, SLOP), None);
    }
}
