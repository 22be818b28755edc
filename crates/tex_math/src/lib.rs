// Re-export glam for convenience
pub use glam::*;

// Texture-space geometry types
mod interval;
mod mat2;
mod quad;
mod rect;

pub use interval::Interval;
pub use mat2::Mat2Ext;
pub use quad::Quad;
pub use rect::Rect;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_creation() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_mat2_columns() {
        // glam matrices are column-major: m[col][row]
        let m = Mat2::from_cols(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        assert_eq!(m.x_axis, Vec2::new(1.0, 2.0));
        assert_eq!(m.col(1).x, 3.0);
        assert_eq!(m * Vec2::X, Vec2::new(1.0, 2.0));
    }
}
