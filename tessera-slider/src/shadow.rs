//! Gradient descriptions for drawing thumb shadows without native elevation.
//!
//! The renderer fills the returned bounds with the described gradient. Edge
//! shadows fade upwards from the shape edge. Corner shadows are wedges of a
//! radial gradient, either outside the corner arc (the usual case) or inside
//! it for concave corners, which are requested with a negative sweep.

use lyon_path::math::{Box2D, Point, point, vector};

const ALPHA_START: u8 = 0x44;
const ALPHA_MIDDLE: u8 = 0x14;
const ALPHA_END: u8 = 0x00;

/// A color in the linear sRGB color space with an alpha component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with an 8-bit alpha.
    #[inline]
    pub fn with_alpha_u8(self, alpha: u8) -> Self {
        Self {
            a: alpha as f32 / 255.0,
            ..self
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// A color at a relative position along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// Vertical linear gradient filling `bounds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub bounds: Box2D,
    pub start: Point,
    pub end: Point,
    pub stops: [GradientStop; 3],
}

/// Radial gradient drawn as a pie wedge of the oval in `bounds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub bounds: Box2D,
    pub center: Point,
    pub radius: f32,
    pub stops: [GradientStop; 4],
    /// Wedge start angle in degrees, clockwise from the positive x axis.
    pub start_angle: f32,
    pub sweep_angle: f32,
    /// Bounds of the shape's own arc. Its wedge is clipped out before
    /// filling an outer corner.
    pub clip_arc: Option<Box2D>,
}

/// Shadow colors derived from a base color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPalette {
    pub start: Color,
    pub middle: Color,
    pub end: Color,
}

impl Default for ShadowPalette {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl ShadowPalette {
    pub fn new(color: Color) -> Self {
        Self {
            start: color.with_alpha_u8(ALPHA_START),
            middle: color.with_alpha_u8(ALPHA_MIDDLE),
            end: color.with_alpha_u8(ALPHA_END),
        }
    }

    /// Shadow along a straight edge, `elevation` pixels tall above `bounds`.
    pub fn edge_shadow(&self, bounds: &Box2D, elevation: f32) -> LinearGradient {
        let bounds = Box2D::new(bounds.min - vector(0.0, elevation), bounds.max);
        LinearGradient {
            bounds,
            start: bounds.min,
            end: point(bounds.min.x, bounds.max.y),
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: self.end,
                },
                GradientStop {
                    offset: 0.5,
                    color: self.middle,
                },
                GradientStop {
                    offset: 1.0,
                    color: self.start,
                },
            ],
        }
    }

    /// Shadow around a corner arc inscribed in `bounds`.
    ///
    /// A negative `sweep_angle` draws the shadow inside the arc. Returns
    /// `None` when the resulting radius is not positive.
    pub fn corner_shadow(
        &self,
        bounds: &Box2D,
        elevation: f32,
        start_angle: f32,
        sweep_angle: f32,
    ) -> Option<RadialGradient> {
        let inside = sweep_angle < 0.0;
        let (bounds, colors, clip_arc) = if inside {
            (*bounds, [self.end, self.middle, self.start], None)
        } else {
            (
                bounds.inflate(elevation, elevation),
                [self.start, self.middle, self.end],
                Some(*bounds),
            )
        };

        let radius = bounds.width() / 2.0;
        if radius <= 0.0 {
            return None;
        }
        let start_ratio = 1.0 - elevation / radius;
        let mid_ratio = start_ratio + (1.0 - start_ratio) / 2.0;

        Some(RadialGradient {
            bounds,
            center: bounds.center(),
            radius,
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: Color::TRANSPARENT,
                },
                GradientStop {
                    offset: start_ratio,
                    color: colors[0],
                },
                GradientStop {
                    offset: mid_ratio,
                    color: colors[1],
                },
                GradientStop {
                    offset: 1.0,
                    color: colors[2],
                },
            ],
            start_angle,
            sweep_angle,
            clip_arc,
        })
    }
}
