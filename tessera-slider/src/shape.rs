//! Corner-treated outlines used to draw thumbs.
//!
//! A [`ShapeAppearance`] describes the four corners of a rectangle, each with
//! a [`CornerTreatment`] and a [`CornerSize`]. [`ShapeAppearance::path`]
//! turns it into a closed [`lyon_path::Path`] for given bounds, ready to be
//! tessellated by the host renderer.
//!
//! # Example
//!
//! ```
//! use lyon_path::math::{Box2D, point};
//! use tessera_slider::shape::ShapeAppearance;
//!
//! let bounds = Box2D::new(point(0.0, 0.0), point(20.0, 20.0));
//! let thumb = ShapeAppearance::thumb();
//! assert!(thumb.is_round_rect(&bounds));
//! let _path = thumb.path(&bounds);
//! ```

use lyon_path::{
    Path,
    math::{Box2D, Point, point},
    path::Builder,
};

/// Control point distance for a cubic quarter circle, relative to the radius.
const QUARTER_ARC_KAPPA: f32 = 0.552_284_8;

/// Corner sizes closer than this are considered equal.
const SIZE_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
enum CornerBase {
    /// Pixels.
    Absolute(f32),
    /// Fraction of the shorter side of the bounds.
    Relative(f32),
}

/// Size of a corner, resolved against the shape bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerSize {
    base: CornerBase,
    adjustment: f32,
}

impl CornerSize {
    pub const ZERO: Self = Self::absolute(0.0);

    pub const fn absolute(size: f32) -> Self {
        Self {
            base: CornerBase::Absolute(size),
            adjustment: 0.0,
        }
    }

    /// A size proportional to the shorter side, `0.5` giving a capsule.
    pub const fn relative(fraction: f32) -> Self {
        Self {
            base: CornerBase::Relative(fraction),
            adjustment: 0.0,
        }
    }

    /// Adds `adjustment` pixels to the resolved size.
    ///
    /// Adjusting an adjusted size accumulates onto the same base.
    pub fn adjusted(self, adjustment: f32) -> Self {
        Self {
            adjustment: self.adjustment + adjustment,
            ..self
        }
    }

    /// Resolves the size in pixels, never below zero.
    pub fn resolve(&self, bounds: &Box2D) -> f32 {
        let base = match self.base {
            CornerBase::Absolute(size) => size,
            CornerBase::Relative(fraction) => fraction * bounds.width().min(bounds.height()),
        };
        (base + self.adjustment).max(0.0)
    }
}

impl Default for CornerSize {
    fn default() -> Self {
        Self::ZERO
    }
}

/// How a corner is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CornerTreatment {
    /// A quarter circle.
    #[default]
    Rounded,
    /// A straight chamfer.
    Cut,
}

/// Treatment and size of one corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Corner {
    pub treatment: CornerTreatment,
    pub size: CornerSize,
}

impl Corner {
    pub const fn new(treatment: CornerTreatment, size: CornerSize) -> Self {
        Self { treatment, size }
    }

    pub const fn rounded(size: CornerSize) -> Self {
        Self::new(CornerTreatment::Rounded, size)
    }

    pub const fn cut(size: CornerSize) -> Self {
        Self::new(CornerTreatment::Cut, size)
    }
}

/// Corners of a rectangular outline, listed clockwise from the top left.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ShapeAppearance {
    pub top_left: Corner,
    pub top_right: Corner,
    pub bottom_right: Corner,
    pub bottom_left: Corner,
}

impl ShapeAppearance {
    /// Uses `corner` for all four corners.
    pub const fn uniform(corner: Corner) -> Self {
        Self {
            top_left: corner,
            top_right: corner,
            bottom_right: corner,
            bottom_left: corner,
        }
    }

    /// The circular thumb outline.
    pub const fn thumb() -> Self {
        Self::uniform(Corner::rounded(CornerSize::relative(0.5)))
    }

    /// Keeps every treatment but replaces every size.
    pub fn with_corner_size(mut self, size: CornerSize) -> Self {
        for corner in self.corners_mut() {
            corner.size = size;
        }
        self
    }

    fn corners(&self) -> [Corner; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    fn corners_mut(&mut self) -> [&mut Corner; 4] {
        [
            &mut self.top_left,
            &mut self.top_right,
            &mut self.bottom_right,
            &mut self.bottom_left,
        ]
    }

    /// Whether the outline is a plain rounded rectangle: all corners rounded
    /// with the same resolved size.
    pub fn is_round_rect(&self, bounds: &Box2D) -> bool {
        let corners = self.corners();
        let size = corners[0].size.resolve(bounds);
        corners.iter().all(|corner| {
            corner.treatment == CornerTreatment::Rounded
                && (corner.size.resolve(bounds) - size).abs() < SIZE_EPSILON
        })
    }

    /// Resolved corner sizes clockwise from the top left, clamped to half of
    /// the shorter side.
    pub fn resolved_sizes(&self, bounds: &Box2D) -> [f32; 4] {
        let limit = (bounds.width().min(bounds.height()) / 2.0).max(0.0);
        self.corners()
            .map(|corner| corner.size.resolve(bounds).min(limit))
    }

    /// Builds the closed outline for `bounds`.
    ///
    /// The path starts on the left edge below the top left corner and runs
    /// clockwise in y-down coordinates.
    pub fn path(&self, bounds: &Box2D) -> Path {
        let [tl, tr, br, bl] = self.resolved_sizes(bounds);
        let (left, top) = (bounds.min.x, bounds.min.y);
        let (right, bottom) = (bounds.max.x, bounds.max.y);

        let mut builder = Path::builder();
        builder.begin(point(left, top + tl));
        corner_to(
            &mut builder,
            self.top_left.treatment,
            point(left, top + tl),
            point(left, top),
            point(left + tl, top),
        );
        edge_to(&mut builder, point(left + tl, top), point(right - tr, top));
        corner_to(
            &mut builder,
            self.top_right.treatment,
            point(right - tr, top),
            point(right, top),
            point(right, top + tr),
        );
        edge_to(&mut builder, point(right, top + tr), point(right, bottom - br));
        corner_to(
            &mut builder,
            self.bottom_right.treatment,
            point(right, bottom - br),
            point(right, bottom),
            point(right - br, bottom),
        );
        edge_to(&mut builder, point(right - br, bottom), point(left + bl, bottom));
        corner_to(
            &mut builder,
            self.bottom_left.treatment,
            point(left + bl, bottom),
            point(left, bottom),
            point(left, bottom - bl),
        );
        builder.close();
        builder.build()
    }
}

fn edge_to(builder: &mut Builder, from: Point, to: Point) {
    if (to - from).square_length() > 0.0 {
        builder.line_to(to);
    }
}

/// Draws one corner from `from` to `to` around the rectangle corner `apex`.
fn corner_to(
    builder: &mut Builder,
    treatment: CornerTreatment,
    from: Point,
    apex: Point,
    to: Point,
) {
    if (to - from).square_length() <= 0.0 {
        return;
    }
    match treatment {
        CornerTreatment::Rounded => {
            let ctrl1 = from + (apex - from) * QUARTER_ARC_KAPPA;
            let ctrl2 = to + (apex - to) * QUARTER_ARC_KAPPA;
            builder.cubic_bezier_to(ctrl1, ctrl2, to);
        }
        CornerTreatment::Cut => {
            builder.line_to(to);
        }
    }
}
