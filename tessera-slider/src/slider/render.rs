//! Geometry a renderer needs to draw the slider.
//!
//! [`Slider::draw_snapshot`] resolves the active track, tick marks, thumbs
//! and halo into widget pixels. The snapshot carries no styling; colors and
//! shapes are left to the host.

use super::Slider;
use crate::{
    error::Result,
    mapping::{CoordinateMapper, TrackGeometry},
};

/// Sizes of the drawn parts, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbMetrics {
    pub thumb_radius: f32,
    /// Radius of the focus/press halo around the focused thumb.
    pub halo_radius: f32,
    /// Vertical center of the track in widget coordinates.
    pub track_center_y: f32,
    pub track_height: f32,
}

/// A tick mark on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub x: f32,
    pub y: f32,
    /// Whether the tick lies on the active part of the track.
    pub active: bool,
}

/// A thumb to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbMark {
    pub index: usize,
    pub value: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub focused: bool,
    pub active: bool,
}

/// Halo drawn around the focused thumb while it is pressed or focused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halo {
    pub index: usize,
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

/// Everything needed to draw one frame of a slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderSnapshot {
    pub enabled: bool,
    pub values: Vec<f32>,
    pub focused_index: usize,
    pub active_index: Option<usize>,
    pub geometry: TrackGeometry,
    /// Normalized start and end of the active track, ascending.
    pub active_range: [f32; 2],
    /// Pixel start and end of the active track, ascending.
    pub active_track: [f32; 2],
    pub ticks: Vec<Tick>,
    pub thumbs: Vec<ThumbMark>,
    pub halo: Option<Halo>,
}

/// Normalized extent of the active track.
///
/// A single thumb is active from the start of the range, several thumbs
/// between the lowest and the highest. The pair is ascending in layout order.
pub fn active_range(values: &[f32], mapper: &CoordinateMapper) -> [f32; 2] {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let low = if values.len() == 1 {
        mapper.value_from
    } else {
        min
    };
    let left = mapper.value_to_normalized(low);
    let right = mapper.value_to_normalized(max);
    if mapper.geometry.is_rtl() {
        [right, left]
    } else {
        [left, right]
    }
}

/// Number of ticks that fit on the track.
///
/// One tick per step, thinned out so ticks stay at least two track heights
/// apart. Continuous sliders have none.
pub fn tick_count(
    value_from: f32,
    value_to: f32,
    step_size: f32,
    track_width: f32,
    track_height: f32,
) -> usize {
    if step_size <= 0.0 {
        return 0;
    }
    let steps = ((value_to - value_from) / step_size).max(0.0) as usize + 1;
    if track_height <= 0.0 {
        return steps;
    }
    let fitting = (track_width / (track_height * 2.0)).max(0.0) as usize + 1;
    steps.min(fitting)
}

/// Index of the tick nearest to a normalized position.
fn pivot_index(tick_count: usize, position: f32) -> usize {
    let last = tick_count.saturating_sub(1);
    ((position * last as f32).round().max(0.0) as usize).min(last)
}

impl Slider {
    /// Resolves the drawable geometry of the current state.
    pub fn draw_snapshot(&mut self, metrics: &ThumbMetrics) -> Result<SliderSnapshot> {
        self.values.validate()?;
        let mapper = self.mapper();
        let geometry = self.geometry;
        let values = self.values.values();

        let active_range = active_range(values, &mapper);
        let to_pixel = |position: f32| geometry.side_padding + position * geometry.track_width;
        let active_track = [to_pixel(active_range[0]), to_pixel(active_range[1])];

        let count = tick_count(
            self.values.value_from(),
            self.values.value_to(),
            self.values.step_size(),
            geometry.track_width,
            metrics.track_height,
        );
        let ticks = if count < 2 {
            Vec::new()
        } else {
            let interval = geometry.track_width / (count - 1) as f32;
            let first_active = pivot_index(count, active_range[0]);
            let last_active = pivot_index(count, active_range[1]);
            (0..count)
                .map(|i| Tick {
                    x: geometry.side_padding + i as f32 * interval,
                    y: metrics.track_center_y,
                    active: i >= first_active && i < last_active,
                })
                .collect()
        };

        let thumbs: Vec<ThumbMark> = values
            .iter()
            .enumerate()
            .map(|(index, &value)| ThumbMark {
                index,
                value,
                center_x: mapper.value_to_pixel(value),
                center_y: metrics.track_center_y,
                radius: metrics.thumb_radius,
                focused: index == self.focused_index,
                active: self.active_index == Some(index),
            })
            .collect();

        let halo = if self.enabled && (self.gesture.pressed || self.has_focus) {
            thumbs.get(self.focused_index).map(|thumb| Halo {
                index: thumb.index,
                center_x: thumb.center_x,
                center_y: thumb.center_y,
                radius: metrics.halo_radius,
            })
        } else {
            None
        };

        Ok(SliderSnapshot {
            enabled: self.enabled,
            values: values.to_vec(),
            focused_index: self.focused_index,
            active_index: self.active_index,
            geometry,
            active_range,
            active_track,
            ticks,
            thumbs,
            halo,
        })
    }
}
