//! Elliptical Weighted Average filtering.
//!
//! The footprint of one screen pixel is modelled as a Gaussian in the level's
//! raster space. Its covariance combines a prefilter term, the screen-pixel
//! Gaussian pushed through the inverse Jacobian `Ji`, with a reconstruction
//! term of fixed size:
//!
//! ```text
//! V = variance_xy * Ji * Ji^T + variance_st * I
//! Q = 0.5 * V^-1
//! w(d) = exp(-d^T Q d)
//! ```
//!
//! Weights are evaluated on every texel of the ellipse's bounding rectangle,
//! truncated where `d^T Q d` reaches `cutoff`, and normalized.

use serde::{Deserialize, Serialize};
use tex_core::{MipLevel, TextureError, TextureResult};
use tex_math::{Mat2, Mat2Ext, Quad, Rect, Vec2};

use crate::sampler::accumulate_bilinear;

/// Value returned when the footprint lies outside the stored level.
pub const BOUNDARY_VALUE: f32 = 0.0;

/// Default Gaussian variance for both the prefilter and reconstruction terms.
pub const DEFAULT_VARIANCE: f32 = 1.3 / (2.0 * std::f32::consts::PI);

/// Raster-space quads below this area are point sampled.
const MIN_FOOTPRINT_AREA: f32 = 1e-10;

/// Tunable constants of the EWA filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EwaParams {
    /// Variance of the screen-pixel prefilter
    pub variance_xy: f32,
    /// Variance of the texel reconstruction filter
    pub variance_st: f32,
    /// Truncation of the quadratic form (weights below `exp(-cutoff)`)
    pub cutoff: f32,
    /// Analytic Jacobians with a smaller determinant are treated as singular
    pub singular_epsilon: f32,
}

impl Default for EwaParams {
    fn default() -> Self {
        Self {
            variance_xy: DEFAULT_VARIANCE,
            variance_st: DEFAULT_VARIANCE,
            cutoff: 4.0,
            singular_epsilon: 1e-12,
        }
    }
}

impl EwaParams {
    pub fn with_variances(mut self, variance_xy: f32, variance_st: f32) -> Self {
        self.variance_xy = variance_xy;
        self.variance_st = variance_st;
        self
    }

    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_singular_epsilon(mut self, epsilon: f32) -> Self {
        self.singular_epsilon = epsilon;
        self
    }

    /// Check that every constant is usable.
    pub fn validate(&self) -> TextureResult<()> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TextureError::InvalidParameter(format!(
                    "EWA {} must be positive, got {}",
                    name, v
                )))
            }
        };
        positive("variance_xy", self.variance_xy)?;
        positive("variance_st", self.variance_st)?;
        positive("cutoff", self.cutoff)?;
        if self.singular_epsilon.is_nan() || self.singular_epsilon < 0.0 {
            return Err(TextureError::InvalidParameter(format!(
                "EWA singular_epsilon must be non-negative, got {}",
                self.singular_epsilon
            )));
        }
        Ok(())
    }
}

/// Normalized filter weights over a rectangle of padded texels.
#[derive(Debug, Clone, PartialEq)]
pub struct EwaWindow {
    /// Padded raster position of the first texel
    pub origin: (i64, i64),
    pub width: usize,
    pub height: usize,
    /// Row-major weights, summing to 1
    pub weights: Vec<f32>,
}

impl EwaWindow {
    /// Padded texel coordinates paired with their weights.
    pub fn texels(&self) -> impl Iterator<Item = (i64, i64, f32)> + '_ {
        self.weights.iter().enumerate().map(move |(i, &w)| {
            let x = self.origin.0 + (i % self.width) as i64;
            let y = self.origin.1 + (i / self.width) as i64;
            (x, y, w)
        })
    }
}

/// Outcome of setting up the filter for one footprint.
enum Support {
    /// Center outside the level, or nothing left after clipping
    Outside,
    /// Degenerate footprint: bilinear lookup at this raster position
    Point(Vec2),
    Window(EwaWindow),
}

/// Inverse Jacobian (raster texels per output pixel) estimated from the
/// footprint corners in raster space.
fn estimate_inverse_jacobian(raster: &Quad) -> Mat2 {
    let p = &raster.corners;
    let along_x = 0.5 * ((p[1] - p[0]) + (p[2] - p[3]));
    let along_y = 0.5 * ((p[3] - p[0]) + (p[2] - p[1]));
    Mat2::from_cols(along_x, along_y)
}

/// Inverse of an analytic texture-to-screen Jacobian after rescaling it to
/// raster texels and output pixels of size `pixel_delta`. `None` if singular.
fn analytic_inverse_jacobian(
    jacobian: Mat2,
    pixel_delta: Vec2,
    raster_scale: Vec2,
    epsilon: f32,
) -> Option<Mat2> {
    let to_pixels = Mat2::from_diagonal(pixel_delta.recip());
    let from_raster = Mat2::from_diagonal(raster_scale.recip());
    (to_pixels * jacobian * from_raster).try_inverse(epsilon)
}

fn support(
    level: &MipLevel,
    footprint: &Quad,
    pixel_delta: Vec2,
    jacobian: Option<Mat2>,
    params: &EwaParams,
) -> Support {
    let raster = footprint.map(|st| level.to_raster(st));
    let center = raster.centroid();
    let bounds = level.padded_bounds();

    if !center.is_finite() || !bounds.contains(center) {
        return Support::Outside;
    }

    let inverse_jacobian = match jacobian {
        None => {
            if raster.area() < MIN_FOOTPRINT_AREA {
                return Support::Point(center);
            }
            Some(estimate_inverse_jacobian(&raster))
        }
        Some(j) => {
            if !pixel_delta.is_finite() || pixel_delta.cmple(Vec2::ZERO).any() {
                return Support::Outside;
            }
            let ji = analytic_inverse_jacobian(
                j,
                pixel_delta,
                level.raster_scale(),
                params.singular_epsilon,
            );
            if ji.is_none() {
                log::trace!("Singular Jacobian {:?}, reconstruction filter only", j);
            }
            ji
        }
    };

    let reconstruction = Mat2::from_diagonal(Vec2::splat(params.variance_st));
    let variance = match inverse_jacobian {
        Some(ji) => ji.gram() * params.variance_xy + reconstruction,
        None => reconstruction,
    };

    let q = match variance.try_inverse(f32::MIN_POSITIVE) {
        Some(inv) => inv * 0.5,
        None => return Support::Point(center),
    };
    let det_q = q.determinant();
    let radius = Vec2::new(
        (q.entry(1, 1) * params.cutoff / det_q).sqrt(),
        (q.entry(0, 0) * params.cutoff / det_q).sqrt(),
    );
    if !radius.is_finite() {
        return Support::Point(center);
    }

    let rect = Rect::around(center, radius).intersect(&bounds);
    if rect.is_empty() {
        return Support::Outside;
    }

    let xs = rect.x.integers();
    let ys = rect.y.integers();
    if xs.is_empty() || ys.is_empty() {
        return Support::Outside;
    }
    let origin = (*xs.start(), *ys.start());
    let width = (xs.end() - xs.start() + 1) as usize;
    let height = (ys.end() - ys.start() + 1) as usize;

    let mut weights = Vec::with_capacity(width * height);
    for y in ys {
        for x in xs.clone() {
            let d = Vec2::new(x as f32, y as f32) - center;
            weights.push((-q.quadratic_form(d)).exp());
        }
    }

    let total: f32 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Support::Outside;
    }
    for w in weights.iter_mut() {
        *w /= total;
    }

    Support::Window(EwaWindow {
        origin,
        width,
        height,
        weights,
    })
}

/// Normalized EWA weights for a footprint, or `None` when the filter falls
/// back to a point sample or the boundary value.
///
/// `footprint` is the backward map of one output pixel, in texture
/// coordinates. `jacobian` maps texture coordinates to screen units, in which
/// an output pixel measures `pixel_delta`; without it the Jacobian is
/// estimated from the footprint corners and `pixel_delta` is unused.
pub fn ewa_weights(
    level: &MipLevel,
    footprint: &Quad,
    pixel_delta: Vec2,
    jacobian: Option<Mat2>,
    params: &EwaParams,
) -> Option<EwaWindow> {
    match support(level, footprint, pixel_delta, jacobian, params) {
        Support::Window(window) => Some(window),
        Support::Outside | Support::Point(_) => None,
    }
}

/// EWA-filter one level over a footprint.
pub fn filter_ewa(
    level: &MipLevel,
    footprint: &Quad,
    pixel_delta: Vec2,
    jacobian: Option<Mat2>,
    params: &EwaParams,
) -> Vec<f32> {
    let mut out = vec![0.0; level.channels()];
    write_ewa(level, footprint, pixel_delta, jacobian, params, &mut out);
    out
}

/// [`filter_ewa`] writing into `out`, which must hold one channel tuple of
/// `level`.
pub fn filter_ewa_into(
    level: &MipLevel,
    footprint: &Quad,
    pixel_delta: Vec2,
    jacobian: Option<Mat2>,
    params: &EwaParams,
    out: &mut [f32],
) -> TextureResult<()> {
    level.check_channels(out)?;
    write_ewa(level, footprint, pixel_delta, jacobian, params, out);
    Ok(())
}

/// Unchecked core of [`filter_ewa_into`]; `out.len()` is `level.channels()`.
pub(crate) fn write_ewa(
    level: &MipLevel,
    footprint: &Quad,
    pixel_delta: Vec2,
    jacobian: Option<Mat2>,
    params: &EwaParams,
    out: &mut [f32],
) {
    match support(level, footprint, pixel_delta, jacobian, params) {
        Support::Outside => out.fill(BOUNDARY_VALUE),
        Support::Point(p) => {
            out.fill(0.0);
            accumulate_bilinear(level, p, 1.0, out);
        }
        Support::Window(window) => {
            out.fill(0.0);
            for (x, y, w) in window.texels() {
                if let Some(texel) = level.texel(x, y) {
                    for (o, v) in out.iter_mut().zip(texel) {
                        *o += w * v;
                    }
                }
            }
        }
    }
}
