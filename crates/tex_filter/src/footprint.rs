//! Texture-space footprints of output pixels.

use tex_math::{Quad, Vec2};

/// Region of texture space `(s, t)` covered by one output sample.
///
/// The corners are the backward-mapped corners of the output pixel, in the
/// order `(0,0)`, `(1,0)`, `(1,1)`, `(0,1)` of that pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    quad: Quad,
}

impl Footprint {
    /// Footprint from four backward-mapped corners.
    pub fn new(corners: [Vec2; 4]) -> Self {
        Self {
            quad: Quad::new(corners),
        }
    }

    /// Axis-aligned box with full extents `size`.
    pub fn from_box(center: Vec2, size: Vec2) -> Self {
        Self {
            quad: Quad::from_box(center, size),
        }
    }

    /// Parallelogram spanned by the texture-space derivatives of one screen
    /// pixel step along x (`dst_dx`) and y (`dst_dy`).
    pub fn from_derivatives(center: Vec2, dst_dx: Vec2, dst_dy: Vec2) -> Self {
        Self {
            quad: Quad::from_axes(center, dst_dx, dst_dy),
        }
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    pub fn corners(&self) -> [Vec2; 4] {
        self.quad.corners
    }

    /// Mean of the corners.
    pub fn center(&self) -> Vec2 {
        self.quad.centroid()
    }

    /// Corners scaled into pixel units, e.g. by level 0's raster scale.
    pub fn scaled(&self, scale: Vec2) -> Quad {
        self.quad.map(|c| c * scale)
    }
}

impl From<Quad> for Footprint {
    fn from(quad: Quad) -> Self {
        Self { quad }
    }
}
