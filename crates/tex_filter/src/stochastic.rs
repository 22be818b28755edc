//! Monte Carlo filtering over a quadrilateral footprint.
//!
//! Sample points are bilinear interpolations of the footprint corners at
//! independent uniform `(u, v)` pairs. The distribution is uniform only for
//! parallelograms; under perspective it follows the pixel's own
//! parameterization, which is what a screen-space box filter wants anyway.

use tex_core::{MipLevel, TextureResult};
use tex_math::Quad;

use crate::sampler::accumulate_bilinear;
use crate::UniformSource;

/// Mean of `num_samples` bilinear lookups inside `quad` (texture space).
///
/// With no samples the quad centroid is point sampled.
pub fn filter_quad_af<S: UniformSource + ?Sized>(
    level: &MipLevel,
    quad: &Quad,
    num_samples: usize,
    rng: &mut S,
) -> Vec<f32> {
    let mut out = vec![0.0; level.channels()];
    write_quad_af(level, quad, num_samples, rng, &mut out);
    out
}

/// [`filter_quad_af`] writing into `out`, which must hold one channel tuple
/// of `level`.
pub fn filter_quad_af_into<S: UniformSource + ?Sized>(
    level: &MipLevel,
    quad: &Quad,
    num_samples: usize,
    rng: &mut S,
    out: &mut [f32],
) -> TextureResult<()> {
    level.check_channels(out)?;
    write_quad_af(level, quad, num_samples, rng, out);
    Ok(())
}

/// Unchecked core of [`filter_quad_af_into`]; `out.len()` is
/// `level.channels()`.
pub(crate) fn write_quad_af<S: UniformSource + ?Sized>(
    level: &MipLevel,
    quad: &Quad,
    num_samples: usize,
    rng: &mut S,
    out: &mut [f32],
) {
    out.fill(0.0);
    if num_samples == 0 {
        accumulate_bilinear(level, level.to_raster(quad.centroid()), 1.0, out);
        return;
    }

    let weight = 1.0 / num_samples as f32;
    for _ in 0..num_samples {
        let u = rng.next_uniform();
        let v = rng.next_uniform();
        accumulate_bilinear(level, level.to_raster(quad.lerp(u, v)), weight, out);
    }
}

/// Weighted variant: each sample is weighted by `weight(u, v)`.
///
/// Returns zeros if the weights sum to zero.
pub fn filter_quad_af_weighted<S, W>(
    level: &MipLevel,
    quad: &Quad,
    num_samples: usize,
    rng: &mut S,
    weight: W,
) -> Vec<f32>
where
    S: UniformSource + ?Sized,
    W: Fn(f32, f32) -> f32,
{
    let mut out = vec![0.0; level.channels()];
    let mut total = 0.0;

    for _ in 0..num_samples {
        let u = rng.next_uniform();
        let v = rng.next_uniform();
        let w = weight(u, v);
        if w == 0.0 {
            continue;
        }
        accumulate_bilinear(level, level.to_raster(quad.lerp(u, v)), w, &mut out);
        total += w;
    }

    if total == 0.0 || !total.is_finite() {
        out.fill(0.0);
        return out;
    }
    for o in out.iter_mut() {
        *o /= total;
    }
    out
}
