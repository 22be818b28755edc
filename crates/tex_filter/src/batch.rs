//! Parallel filtering of many footprints.
//!
//! Requests are independent and the texture map is read-only, so they are
//! spread over rayon's thread pool. Each request gets its own `StdRng` seeded
//! from the batch seed and its index, which keeps stochastic results identical
//! no matter how the work is scheduled.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tex_core::{TextureError, TextureResult};

use crate::{FilterMethod, FilterRequest, Footprint, TextureMap};

/// Odd 64-bit constant (2^64 / golden ratio) spreading request indices.
const INDEX_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random generator for request `index` of a batch.
///
/// Neighbouring seeds do not share streams: `(seed, index + 1)` and
/// `(seed + 1, index)` seed different generators.
#[inline]
pub fn request_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(INDEX_MIX))
}

/// Filter every footprint with the same method and request.
///
/// Returns one channel tuple per footprint, in input order.
pub fn filter_batch(
    map: &TextureMap,
    method: FilterMethod,
    footprints: &[Footprint],
    request: &FilterRequest,
    seed: u64,
) -> Vec<Vec<f32>> {
    footprints
        .par_iter()
        .enumerate()
        .map(|(i, fp)| map.filter(method, fp, request, &mut request_rng(seed, i)))
        .collect()
}

/// [`filter_batch`] writing interleaved channel tuples into `out`.
///
/// `out` must hold exactly `footprints.len() * map.channels()` values.
pub fn filter_batch_into(
    map: &TextureMap,
    method: FilterMethod,
    footprints: &[Footprint],
    request: &FilterRequest,
    seed: u64,
    out: &mut [f32],
) -> TextureResult<()> {
    let channels = map.channels();
    let expected = footprints.len() * channels;
    if out.len() != expected {
        return Err(TextureError::ChannelMismatch {
            expected,
            actual: out.len(),
        });
    }

    out.par_chunks_mut(channels)
        .zip(footprints.par_iter())
        .enumerate()
        .for_each(|(i, (dst, fp))| {
            let value = map.filter(method, fp, request, &mut request_rng(seed, i));
            dst.copy_from_slice(&value);
        });

    log::debug!("Filtered {} footprints with {}", footprints.len(), method);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextureConfig;
    use rand::RngCore;
    use std::collections::HashSet;
    use tex_core::Image;
    use tex_math::Vec2;

    fn map() -> TextureMap {
        let image = Image::from_fn(32, 32, 3, |x, y, p| {
            p[0] = x as f32 / 31.0;
            p[1] = y as f32 / 31.0;
            p[2] = ((x / 4 + y / 4) % 2) as f32;
        })
        .unwrap();
        TextureMap::new(&image, TextureConfig::default().with_quad_samples(8)).unwrap()
    }

    fn footprints() -> Vec<Footprint> {
        (0..100)
            .map(|i| {
                let s = (i % 10) as f32 / 10.0 + 0.05;
                let t = (i / 10) as f32 / 10.0 + 0.05;
                Footprint::from_box(Vec2::new(s, t), Vec2::new(0.02 + 0.001 * i as f32, 0.03))
            })
            .collect()
    }

    #[test]
    fn test_request_rng_streams_are_distinct() {
        assert_ne!(request_rng(0, 1).next_u64(), request_rng(1, 0).next_u64());
        assert_eq!(request_rng(5, 3).next_u64(), request_rng(5, 3).next_u64());

        let mut seen = HashSet::new();
        for seed in 0..16u64 {
            for index in 0..256 {
                assert!(seen.insert(request_rng(seed, index).next_u64()), "seed {} index {}", seed, index);
            }
        }
    }

    #[test]
    fn test_adjacent_seeds_give_different_batches() {
        let map = map();
        let fps = vec![Footprint::from_box(Vec2::new(0.4, 0.6), Vec2::new(0.3, 0.2)); 20];
        let request = FilterRequest::default();

        // Same footprint everywhere: only the per-request streams differ
        let a = filter_batch(&map, FilterMethod::QuadAf, &fps, &request, 0);
        let b = filter_batch(&map, FilterMethod::QuadAf, &fps, &request, 1);
        assert_ne!(&a[1..], &b[..b.len() - 1]);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let map = map();
        let fps = footprints();
        let request = FilterRequest::default();

        for method in FilterMethod::ALL {
            let batch = filter_batch(&map, method, &fps, &request, 99);
            assert_eq!(batch.len(), fps.len());
            for (i, fp) in fps.iter().enumerate() {
                let single = map.filter(method, fp, &request, &mut request_rng(99, i));
                assert_eq!(batch[i], single, "{} footprint {}", method, i);
            }
        }
    }

    #[test]
    fn test_batch_is_deterministic() {
        let map = map();
        let fps = footprints();
        let request = FilterRequest::default();

        let a = filter_batch(&map, FilterMethod::QuadAf, &fps, &request, 7);
        let b = filter_batch(&map, FilterMethod::QuadAf, &fps, &request, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_into() {
        let map = map();
        let fps = footprints();
        let request = FilterRequest::default();

        let mut out = vec![0.0; fps.len() * 3];
        filter_batch_into(&map, FilterMethod::Ewa, &fps, &request, 0, &mut out).unwrap();
        let nested = filter_batch(&map, FilterMethod::Ewa, &fps, &request, 0);
        assert_eq!(out, nested.concat());
    }

    #[test]
    fn test_batch_into_checks_length() {
        let map = map();
        let fps = footprints();
        let mut out = vec![0.0; 10];
        let result = filter_batch_into(
            &map,
            FilterMethod::Trilinear,
            &fps,
            &FilterRequest::default(),
            0,
            &mut out,
        );
        assert!(matches!(
            result,
            Err(TextureError::ChannelMismatch { expected: 300, actual: 10 })
        ));
    }
}
