use crate::{Interval, Vec2};

/// Axis-aligned rectangle in a 2D texture or raster space.
///
/// A rect is defined by two intervals (one per axis). Filters use it for
/// image extents and for clipping filter supports against them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: Interval,
    pub y: Interval,
}

impl Rect {
    /// Create a rect from two corner points.
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
        }
    }

    /// Rect centered on `center` with per-axis half extents `radius`.
    pub fn around(center: Vec2, radius: Vec2) -> Self {
        Self {
            x: Interval::around(center.x, radius.x),
            y: Interval::around(center.y, radius.y),
        }
    }

    /// The overlap of two rects (may be empty).
    pub fn intersect(&self, other: &Rect) -> Self {
        Self {
            x: self.x.intersect(&other.x),
            y: self.y.intersect(&other.y),
        }
    }

    /// Returns true if either axis is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// Returns true if the point lies inside (inclusive bounds).
    pub fn contains(&self, p: Vec2) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }
}
