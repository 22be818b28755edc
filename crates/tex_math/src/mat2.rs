// 2x2 matrix utilities for Jacobians and elliptical filters
//
// Extends glam::Mat2 with the helpers EWA filtering needs.
// Note: glam::Mat2 already provides determinant(), inverse() and transpose()

use glam::{Mat2, Vec2};

/// Extension trait for Mat2 to provide filter-kernel utilities
pub trait Mat2Ext {
    /// Element at `row`, `col` (glam stores columns, this reads row-major).
    fn entry(&self, row: usize, col: usize) -> f32;

    /// Evaluate the quadratic form `v^T M v`.
    ///
    /// Only the symmetric part of the matrix contributes, so this equals
    /// `M00 x^2 + (M01 + M10) x y + M11 y^2`.
    fn quadratic_form(&self, v: Vec2) -> f32;

    /// `M * M^T`, the covariance a linear map applies to a unit isotropic
    /// distribution.
    fn gram(&self) -> Mat2;

    /// Inverse, or `None` when the determinant magnitude is below `epsilon`
    /// or any entry is non-finite.
    fn try_inverse(&self, epsilon: f32) -> Option<Mat2>;
}

impl Mat2Ext for Mat2 {
    fn entry(&self, row: usize, col: usize) -> f32 {
        self.col(col)[row]
    }

    fn quadratic_form(&self, v: Vec2) -> f32 {
        let m00 = self.x_axis.x;
        let m10 = self.x_axis.y;
        let m01 = self.y_axis.x;
        let m11 = self.y_axis.y;
        m00 * v.x * v.x + (m01 + m10) * v.x * v.y + m11 * v.y * v.y
    }

    fn gram(&self) -> Mat2 {
        *self * self.transpose()
    }

    fn try_inverse(&self, epsilon: f32) -> Option<Mat2> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < epsilon {
            return None;
        }
        Some(self.inverse())
    }
}
