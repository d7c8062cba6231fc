//! Mapping between value space and track space.
//!
//! Three coordinate spaces are involved:
//!
//! - **value space**: `value_from..=value_to`, always ascending;
//! - **normalized space**: `0.0..=1.0` along the track in layout order, so
//!   `0.0` is the start edge for left-to-right and the end edge for
//!   right-to-left;
//! - **pixel space**: horizontal widget coordinates, where the track starts
//!   at `side_padding` and spans `track_width` pixels.

/// Horizontal layout direction of the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum LayoutDirection {
    /// Values grow to the right.
    #[default]
    LeftToRight,
    /// Values grow to the left.
    RightToLeft,
}

impl LayoutDirection {
    pub fn is_rtl(self) -> bool {
        self == LayoutDirection::RightToLeft
    }
}

/// Track placement derived from the widget layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackGeometry {
    /// Width of the track between both side paddings, in pixels.
    pub track_width: f32,
    /// Distance from the widget edge to the start of the track, in pixels.
    pub side_padding: f32,
    pub direction: LayoutDirection,
}

impl TrackGeometry {
    pub fn new(track_width: f32, side_padding: f32, direction: LayoutDirection) -> Self {
        Self {
            track_width,
            side_padding,
            direction,
        }
    }

    /// Lays out a track inside a widget `width` pixels wide.
    pub fn for_width(width: f32, side_padding: f32, direction: LayoutDirection) -> Self {
        Self::new((width - side_padding * 2.0).max(0.0), side_padding, direction)
    }

    pub fn is_rtl(&self) -> bool {
        self.direction.is_rtl()
    }
}

/// Pure conversions between values, normalized positions and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub value_from: f32,
    pub value_to: f32,
    pub geometry: TrackGeometry,
}

impl CoordinateMapper {
    pub fn new(value_from: f32, value_to: f32, geometry: TrackGeometry) -> Self {
        Self {
            value_from,
            value_to,
            geometry,
        }
    }

    fn range(&self) -> f32 {
        self.value_to - self.value_from
    }

    /// Proportion of the track covered by `value`, mirrored for RTL.
    pub fn value_to_normalized(&self, value: f32) -> f32 {
        let normalized = (value - self.value_from) / self.range();
        if self.geometry.is_rtl() {
            1.0 - normalized
        } else {
            normalized
        }
    }

    /// Inverse of [`Self::value_to_normalized`].
    pub fn normalized_to_value(&self, position: f32) -> f32 {
        let position = if self.geometry.is_rtl() {
            1.0 - position
        } else {
            position
        };
        position * self.range() + self.value_from
    }

    /// Same as [`Self::normalized_to_value`] for an already snapped position.
    pub fn normalized_to_value_f64(&self, position: f64) -> f32 {
        let position = if self.geometry.is_rtl() {
            1.0 - position
        } else {
            position
        };
        (position * f64::from(self.range()) + f64::from(self.value_from)) as f32
    }

    /// Position of a pixel along the track, clamped to `0.0..=1.0`.
    ///
    /// The result is in layout order and not mirrored. A collapsed track maps
    /// every pixel to `0.0`.
    pub fn pixel_to_normalized(&self, x: f32) -> f32 {
        if self.geometry.track_width <= 0.0 {
            return 0.0;
        }
        ((x - self.geometry.side_padding) / self.geometry.track_width).clamp(0.0, 1.0)
    }

    pub fn value_to_pixel(&self, value: f32) -> f32 {
        self.geometry.side_padding + self.value_to_normalized(value) * self.geometry.track_width
    }

    /// Value under pixel `x`, clamped to the track.
    pub fn pixel_to_value(&self, x: f32) -> f32 {
        self.normalized_to_value(self.pixel_to_normalized(x))
    }

    /// Signed value displacement produced by moving `length` pixels along the
    /// track in layout order.
    ///
    /// The result is negative for right-to-left layouts, where moving right
    /// decreases the value.
    pub fn pixel_length_to_value(&self, length: f32) -> f32 {
        if length == 0.0 || self.geometry.track_width <= 0.0 {
            return 0.0;
        }
        let proportion = length / self.geometry.track_width;
        self.normalized_to_value(proportion) - self.normalized_to_value(0.0)
    }
}
