//! Sampling primitives shared by the filters: the random number source and
//! weighted bilinear accumulation.

use rand::RngCore;
use tex_core::MipLevel;
use tex_math::Vec2;

/// Source of uniform random numbers in `[0, 1)`.
///
/// Implemented for every [`RngCore`], so seeded `StdRng`s work directly and
/// concurrent callers can each own an independent generator.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f32;
}

impl<R: RngCore + ?Sized> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        // 24 random bits fill the f32 mantissa exactly
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }
}

/// Add `weight` times the bilinear lookup at padded raster position `p` to
/// `out`, which holds one channel tuple of `level`.
#[inline]
pub(crate) fn accumulate_bilinear(level: &MipLevel, p: Vec2, weight: f32, out: &mut [f32]) {
    for (texel, w) in level.bilinear_taps(p) {
        for (o, v) in out.iter_mut().zip(texel) {
            *o += weight * w * v;
        }
    }
}
