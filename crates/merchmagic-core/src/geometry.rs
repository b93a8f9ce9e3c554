//! Geometry and clamp engine.
//!
//! Pure, allocation-free math used on every pointer event while the artwork is
//! dragged, scaled or rotated. Coordinates are canvas units with the origin at
//! the top-left corner and +Y pointing down; angles are degrees, clockwise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparisons closer than this are treated as equal. Keeps clamping
/// idempotent in the presence of floating point round-off.
pub const CLAMP_EPSILON: f64 = 1e-9;

/// A 2D point in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `t`.
    pub fn translated(self, t: Translation) -> Self {
        Self::new(self.x + t.dx, self.y + t.dy)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Width and height of an unscaled object.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle described by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds the rectangle spanning the given edges.
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// A rectangle of `size` centred on `center`.
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `other` lies inside this rectangle, allowing `tolerance` of slack
    /// on every edge.
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.left >= self.left - tolerance
            && other.top >= self.top - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Returns this rectangle moved by `t`.
    pub fn translated(&self, t: Translation) -> Self {
        Self::new(self.left + t.dx, self.top + t.dy, self.width, self.height)
    }
}

/// A displacement along both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub const ZERO: Translation = Translation { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// How an object larger than the region is placed on the overflowing axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Align the object's left/top edge with the region's left/top edge.
    #[default]
    PinNearEdge,
    /// Centre the object on the region so it overflows both edges equally.
    Center,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinNearEdge => write!(f, "pin-near-edge"),
            Self::Center => write!(f, "center"),
        }
    }
}

/// Pose and intrinsic size of a transformable object.
///
/// `center` is the rotation centre; `size` is the unscaled extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectGeometry {
    pub center: Point,
    pub size: Size,
    pub scale: f64,
    pub angle: f64,
}

impl ObjectGeometry {
    pub fn new(center: Point, size: Size, scale: f64, angle: f64) -> Self {
        Self {
            center,
            size,
            scale,
            angle,
        }
    }

    /// World-space axis-aligned bounding box of the rotated, scaled object.
    pub fn bounding_box(&self) -> Rect {
        rotated_bounding_box(self.center, self.size, self.scale, self.angle)
    }
}

/// Axis-aligned bounding box of a `size` rectangle scaled by `scale` and
/// rotated by `angle` degrees around `center`.
pub fn rotated_bounding_box(center: Point, size: Size, scale: f64, angle: f64) -> Rect {
    let half_w = size.width * scale.abs() / 2.0;
    let half_h = size.height * scale.abs() / 2.0;
    let (sin, cos) = angle.to_radians().sin_cos();
    let extent_x = (half_w * cos).abs() + (half_h * sin).abs();
    let extent_y = (half_w * sin).abs() + (half_h * cos).abs();
    Rect::from_ltrb(
        center.x - extent_x,
        center.y - extent_y,
        center.x + extent_x,
        center.y + extent_y,
    )
}

/// Translation that moves `object`'s bounding box inside `region`.
///
/// Returns [`Translation::ZERO`] when the box is already contained. On an axis
/// where the box is larger than the region, `policy` decides the placement.
pub fn clamp_to_region(
    object: &ObjectGeometry,
    region: &Rect,
    policy: OverflowPolicy,
) -> Translation {
    clamp_rect_to_region(&object.bounding_box(), region, policy)
}

/// [`clamp_to_region`] for an already computed bounding box.
pub fn clamp_rect_to_region(bounds: &Rect, region: &Rect, policy: OverflowPolicy) -> Translation {
    Translation::new(
        clamp_axis(bounds.left, bounds.width, region.left, region.width, policy),
        clamp_axis(bounds.top, bounds.height, region.top, region.height, policy),
    )
}

fn clamp_axis(
    lo: f64,
    extent: f64,
    region_lo: f64,
    region_extent: f64,
    policy: OverflowPolicy,
) -> f64 {
    let hi = lo + extent;
    let region_hi = region_lo + region_extent;

    let delta = if extent > region_extent + CLAMP_EPSILON {
        match policy {
            OverflowPolicy::PinNearEdge => region_lo - lo,
            OverflowPolicy::Center => (region_lo + region_extent / 2.0) - (lo + extent / 2.0),
        }
    } else if lo < region_lo - CLAMP_EPSILON {
        region_lo - lo
    } else if hi > region_hi + CLAMP_EPSILON {
        region_hi - hi
    } else {
        0.0
    };

    if delta.abs() <= CLAMP_EPSILON {
        0.0
    } else {
        delta
    }
}

/// Maps any angle to the half-open range `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}
