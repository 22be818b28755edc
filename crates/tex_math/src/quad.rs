use crate::Vec2;

/// A quadrilateral given by four consistently wound corners.
///
/// Corner order follows a pixel's corners: `(0,0)`, `(1,0)`, `(1,1)`, `(0,1)`.
/// Under a perspective mapping the quad is generally not a parallelogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Vec2; 4],
}

impl Quad {
    /// Create a quad from four corners.
    pub fn new(corners: [Vec2; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned box centered on `center` with full extents `size`.
    pub fn from_box(center: Vec2, size: Vec2) -> Self {
        let h = size * 0.5;
        Self::new([
            Vec2::new(center.x - h.x, center.y - h.y),
            Vec2::new(center.x + h.x, center.y - h.y),
            Vec2::new(center.x + h.x, center.y + h.y),
            Vec2::new(center.x - h.x, center.y + h.y),
        ])
    }

    /// Parallelogram centered on `center` spanned by two edge vectors.
    pub fn from_axes(center: Vec2, du: Vec2, dv: Vec2) -> Self {
        let origin = center - 0.5 * (du + dv);
        Self::new([origin, origin + du, origin + du + dv, origin + dv])
    }

    /// Apply a point mapping to every corner.
    pub fn map(&self, f: impl Fn(Vec2) -> Vec2) -> Quad {
        Quad::new(self.corners.map(f))
    }

    /// Mean of the four corners.
    pub fn centroid(&self) -> Vec2 {
        self.corners.iter().copied().sum::<Vec2>() * 0.25
    }

    /// Edge vectors `c[i+1] - c[i]`, wrapping around.
    pub fn edges(&self) -> [Vec2; 4] {
        let c = &self.corners;
        [c[1] - c[0], c[2] - c[1], c[3] - c[2], c[0] - c[3]]
    }

    /// Vectors joining opposite edge midpoints.
    ///
    /// The first spans the quad along its `(0,0) -> (1,0)` direction, the
    /// second along `(0,0) -> (0,1)`. Together they describe the
    /// parallelogram that best approximates the quad.
    pub fn midpoint_axes(&self) -> (Vec2, Vec2) {
        let c = &self.corners;
        let v1 = 0.5 * (c[1] + c[2]) - 0.5 * (c[0] + c[3]);
        let v2 = 0.5 * (c[2] + c[3]) - 0.5 * (c[0] + c[1]);
        (v1, v2)
    }

    /// Signed area (positive for counter-clockwise winding in a y-up frame).
    pub fn signed_area(&self) -> f32 {
        let c = &self.corners;
        let mut twice = 0.0;
        for i in 0..4 {
            twice += c[i].perp_dot(c[(i + 1) % 4]);
        }
        0.5 * twice
    }

    /// Unsigned area.
    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Bilinear interpolation of the corners at `(u, v)` in the unit square.
    pub fn lerp(&self, u: f32, v: f32) -> Vec2 {
        let c = &self.corners;
        let bottom = c[0].lerp(c[1], u);
        let top = c[3].lerp(c[2], u);
        bottom.lerp(top, v)
    }
}
