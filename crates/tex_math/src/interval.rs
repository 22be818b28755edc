use std::ops::RangeInclusive;

/// A closed interval `[min, max]` on the real line.
///
/// Used for raster spans: filter supports, level ranges and image extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval centered on `center` reaching `radius` to each side.
    pub fn around(center: f32, radius: f32) -> Self {
        Self::new(center - radius, center + radius)
    }

    /// Returns true if the interval contains nothing (min > max).
    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// The overlap of two intervals (may be empty).
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Integer sample positions lying inside the interval.
    ///
    /// The range is empty when no integer falls within `[min, max]`.
    #[allow(clippy::reversed_empty_ranges)]
    pub fn integers(&self) -> RangeInclusive<i64> {
        if self.is_empty() || !self.min.is_finite() || !self.max.is_finite() {
            return 1..=0;
        }
        (self.min.ceil() as i64)..=(self.max.floor() as i64)
    }
}
