//! Mipmap level selection.
//!
//! Each method maps a footprint, scaled into level-0 pixel units, to a
//! continuous level index. Smaller footprints select finer levels. Methods
//! differ in how much they trust the footprint's narrow direction:
//! `MinSideLen` and `MinQuadWidth` pick sharp levels and leave anti-aliasing
//! to an anisotropic filter, `Trilinear` picks the level that covers the
//! whole footprint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tex_core::{MipmapPyramid, TextureError};
use tex_math::Quad;

use crate::Footprint;

/// Level selection heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelMethod {
    /// Shortest quad edge.
    MinSideLen,
    /// Narrow width of the parallelogram approximating the quad.
    #[default]
    MinQuadWidth,
    /// Shortest centroid to corner distance.
    MinDiag,
    /// Longest centroid to corner distance.
    Trilinear,
    /// Always the full-resolution level.
    Level0,
}

impl LevelMethod {
    pub const ALL: [LevelMethod; 5] = [
        LevelMethod::MinSideLen,
        LevelMethod::MinQuadWidth,
        LevelMethod::MinDiag,
        LevelMethod::Trilinear,
        LevelMethod::Level0,
    ];

    /// Configuration name of the method.
    pub fn name(self) -> &'static str {
        match self {
            LevelMethod::MinSideLen => "minSideLen",
            LevelMethod::MinQuadWidth => "minQuadWidth",
            LevelMethod::MinDiag => "minDiag",
            LevelMethod::Trilinear => "trilinear",
            LevelMethod::Level0 => "level0",
        }
    }

    /// Unclamped level for a quad given in level-0 pixel units.
    ///
    /// Degenerate quads produce `-inf` or NaN.
    pub fn raw_level(self, quad: &Quad) -> f32 {
        match self {
            LevelMethod::MinSideLen => {
                let shortest = quad
                    .edges()
                    .iter()
                    .map(|e| e.length_squared())
                    .fold(f32::INFINITY, f32::min);
                0.5 * shortest.log2()
            }
            LevelMethod::MinQuadWidth => {
                // min(|v1|^2, |v2|^2) * sin^2(theta) == cross^2 / max(|v1|^2, |v2|^2)
                let (v1, v2) = quad.midpoint_axes();
                let cross = v1.perp_dot(v2);
                let longest = v1.length_squared().max(v2.length_squared());
                0.5 * (cross * cross / longest).log2()
            }
            LevelMethod::MinDiag => {
                let center = quad.centroid();
                let nearest = quad
                    .corners
                    .iter()
                    .map(|c| c.distance_squared(center))
                    .fold(f32::INFINITY, f32::min);
                0.5 * nearest.log2()
            }
            LevelMethod::Trilinear => {
                let center = quad.centroid();
                let farthest = quad
                    .corners
                    .iter()
                    .map(|c| c.distance_squared(center))
                    .fold(0.0, f32::max);
                0.5 * farthest.log2()
            }
            LevelMethod::Level0 => 0.0,
        }
    }
}

impl fmt::Display for LevelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LevelMethod {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LevelMethod::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| TextureError::UnknownLevelMethod(s.to_string()))
    }
}

/// Clamp a raw level into `[0, num_levels - 1]`. NaN maps to 0.
pub fn clamp_level(raw: f32, num_levels: usize) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    let coarsest = num_levels.saturating_sub(1) as f32;
    raw.clamp(0.0, coarsest)
}

/// Continuous pyramid level for a texture-space footprint.
pub fn calculate_level(pyramid: &MipmapPyramid, footprint: &Footprint, method: LevelMethod) -> f32 {
    let quad = footprint.scaled(pyramid.base_scale());
    clamp_level(method.raw_level(&quad), pyramid.num_levels())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tex_core::Image;
    use tex_math::Vec2;

    fn skewed() -> Quad {
        Quad::new([
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(5.0, 3.0),
            Vec2::new(0.5, 2.5),
        ])
    }

    fn pyramid(side: usize) -> MipmapPyramid {
        MipmapPyramid::build(&Image::filled(side, side, &[0.5]).unwrap(), 4.0).unwrap()
    }

    #[test]
    fn test_axis_aligned_square() {
        // A 4x4 pixel square is level 2 under every area-based method
        let quad = Quad::from_box(Vec2::new(10.0, 10.0), Vec2::splat(4.0));
        assert!((LevelMethod::MinSideLen.raw_level(&quad) - 2.0).abs() < 1e-6);
        assert!((LevelMethod::MinQuadWidth.raw_level(&quad) - 2.0).abs() < 1e-6);

        // Centroid to corner is half the diagonal: sqrt(8)
        assert!((LevelMethod::MinDiag.raw_level(&quad) - 1.5).abs() < 1e-6);
        assert!((LevelMethod::Trilinear.raw_level(&quad) - 1.5).abs() < 1e-6);
        assert_eq!(LevelMethod::Level0.raw_level(&quad), 0.0);
    }

    #[test]
    fn test_rectangle_uses_narrow_side() {
        let quad = Quad::from_box(Vec2::ZERO, Vec2::new(16.0, 2.0));
        assert!((LevelMethod::MinSideLen.raw_level(&quad) - 1.0).abs() < 1e-6);
        assert!((LevelMethod::MinQuadWidth.raw_level(&quad) - 1.0).abs() < 1e-6);
        assert!(LevelMethod::Trilinear.raw_level(&quad) > 3.0);
    }

    #[test]
    fn test_quad_width_accounts_for_skew() {
        // A sheared parallelogram has long sides but a narrow width
        let quad = Quad::from_axes(Vec2::ZERO, Vec2::new(8.0, 0.0), Vec2::new(8.0, 1.0));
        let side = LevelMethod::MinSideLen.raw_level(&quad);
        let width = LevelMethod::MinQuadWidth.raw_level(&quad);
        assert!((side - 3.0).abs() < 1e-6);

        // Midpoint axes (8, 0) and (8, 1): width 8 / sqrt(65)
        let expected = 0.5 * (64.0f32 / 65.0).log2();
        assert!((width - expected).abs() < 1e-5, "width level {}", width);
    }

    #[test]
    fn test_quad_width_doubling_adds_one() {
        for quad in [skewed(), Quad::from_box(Vec2::ZERO, Vec2::new(3.0, 7.0))] {
            let doubled = quad.map(|c| 2.0 * c);
            for method in [
                LevelMethod::MinSideLen,
                LevelMethod::MinQuadWidth,
                LevelMethod::MinDiag,
                LevelMethod::Trilinear,
            ] {
                let delta = method.raw_level(&doubled) - method.raw_level(&quad);
                assert!((delta - 1.0).abs() < 1e-5, "{} delta {}", method, delta);
            }
        }
    }

    #[test]
    fn test_calculate_level_clamps() {
        let pyramid = pyramid(16);
        assert_eq!(pyramid.num_levels(), 5);

        // Far smaller than a pixel
        let tiny = Footprint::from_box(Vec2::splat(0.5), Vec2::splat(1e-4));
        assert_eq!(calculate_level(&pyramid, &tiny, LevelMethod::MinQuadWidth), 0.0);

        // Larger than the whole texture
        let huge = Footprint::from_box(Vec2::splat(0.5), Vec2::splat(40.0));
        assert_eq!(calculate_level(&pyramid, &huge, LevelMethod::MinQuadWidth), 4.0);

        // Zero area
        let flat = Footprint::from_box(Vec2::splat(0.5), Vec2::new(0.2, 0.0));
        assert_eq!(calculate_level(&pyramid, &flat, LevelMethod::MinQuadWidth), 0.0);
        let point = Footprint::from_box(Vec2::splat(0.5), Vec2::ZERO);
        assert_eq!(calculate_level(&pyramid, &point, LevelMethod::MinQuadWidth), 0.0);
    }

    #[test]
    fn test_calculate_level_in_texture_units() {
        // 17x17 texture: level-0 scale is 16, so a 0.25 box spans 4 pixels
        let pyramid = pyramid(17);
        let fp = Footprint::from_box(Vec2::splat(0.5), Vec2::splat(0.25));
        let level = calculate_level(&pyramid, &fp, LevelMethod::MinQuadWidth);
        assert!((level - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_level0_ignores_footprint() {
        let pyramid = pyramid(8);
        for size in [1e-3, 0.1, 0.5, 3.0] {
            let fp = Footprint::from_box(Vec2::splat(0.5), Vec2::splat(size));
            assert_eq!(calculate_level(&pyramid, &fp, LevelMethod::Level0), 0.0);
        }
    }

    #[test]
    fn test_parse_names() {
        for method in LevelMethod::ALL {
            assert_eq!(method.name().parse::<LevelMethod>().unwrap(), method);
            assert_eq!(method.to_string(), method.name());
        }
        assert_eq!(LevelMethod::default(), LevelMethod::MinQuadWidth);

        match "maxAniso".parse::<LevelMethod>() {
            Err(TextureError::UnknownLevelMethod(name)) => assert_eq!(name, "maxAniso"),
            other => panic!("expected unknown method, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_names_match() {
        for method in LevelMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.name()));
            let back: LevelMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(back, method);
        }
        assert!(serde_json::from_str::<LevelMethod>("\"bogus\"").is_err());
    }
}
