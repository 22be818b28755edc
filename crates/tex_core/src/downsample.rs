//! Factor-of-two image reduction for pyramid construction.
//!
//! Each axis is filtered with a kernel whose parity matches the input side
//! length, then every second sample is kept. For an even side the retained
//! samples sit between two parent pixels (child `k` is centred on parent
//! position `2k + 0.5`); for an odd side they sit on every other parent pixel
//! (`2k`). The output side is `ceil(side / 2)` either way.
//!
//! Reads outside the image are zero (constant padding), and results are
//! clamped to [0, 1].

use crate::error::check_kernel_width;
use crate::kernel::{make_kernel, Kernel, Parity};
use crate::{Image, TextureError, TextureResult};

/// Parent-grid position of the centre of child sample `k`.
#[inline]
pub fn child_center(k: usize, parent_side: usize) -> f32 {
    let shift = match Parity::of_side(parent_side) {
        Parity::Even => 0.5,
        Parity::Odd => 0.0,
    };
    2.0 * k as f32 + shift
}

/// Output side length for a parent side.
#[inline]
pub fn reduced_side(side: usize) -> usize {
    side.div_ceil(2)
}

/// Filter and decimate `image` by two along both axes.
///
/// Fails for a non-positive kernel width, or when either side is 1 (there is
/// nothing left to reduce; pyramid construction stops before that point).
pub fn downsample(image: &Image, kernel_width: f32) -> TextureResult<Image> {
    let kernel_width = check_kernel_width(kernel_width)?;
    if image.width() < 2 || image.height() < 2 {
        return Err(TextureError::InvalidParameter(format!(
            "cannot downsample a {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let kernel_x = make_kernel(kernel_width, Parity::of_side(image.width()));
    let kernel_y = make_kernel(kernel_width, Parity::of_side(image.height()));

    let rows = reduce_rows(image, &kernel_x);
    let mut out = reduce_columns(&rows, &kernel_y);
    out.clamp_unit();
    Ok(out)
}

/// Index of the first parent tap contributing to child `k`.
#[inline]
fn first_tap(k: usize, parent_side: usize, kernel: &Kernel) -> i64 {
    (child_center(k, parent_side) + kernel.first_tap_offset()).round() as i64
}

/// Taps of `kernel` starting at parent index `start` that land inside
/// `[0, side)`, with the parent index of the first one.
///
/// Taps outside read the zero padding and are skipped.
fn clipped_taps(start: i64, kernel: &Kernel, side: usize) -> (usize, &[f32]) {
    let profile = kernel.profile();
    let len = profile.len() as i64;
    let lo = (-start).clamp(0, len);
    let hi = (side as i64 - start).clamp(lo, len);
    ((start + lo).max(0) as usize, &profile[lo as usize..hi as usize])
}

/// Horizontal pass: `w x h` to `ceil(w/2) x h`.
fn reduce_rows(src: &Image, kernel: &Kernel) -> Image {
    let out_w = reduced_side(src.width());
    let mut out = Image::zeroed(out_w, src.height(), src.channels());

    for y in 0..src.height() {
        for k in 0..out_w {
            let (first, taps) = clipped_taps(first_tap(k, src.width(), kernel), kernel, src.width());
            let dst = out.pixel_mut(k, y);
            for (i, &w) in taps.iter().enumerate() {
                for (d, v) in dst.iter_mut().zip(src.pixel(first + i, y)) {
                    *d += w * v;
                }
            }
        }
    }

    out
}

/// Vertical pass: `w x h` to `w x ceil(h/2)`.
fn reduce_columns(src: &Image, kernel: &Kernel) -> Image {
    let out_h = reduced_side(src.height());
    let mut out = Image::zeroed(src.width(), out_h, src.channels());

    for k in 0..out_h {
        let (first, taps) = clipped_taps(first_tap(k, src.height(), kernel), kernel, src.height());
        for x in 0..src.width() {
            let dst = out.pixel_mut(x, k);
            for (i, &w) in taps.iter().enumerate() {
                for (d, v) in dst.iter_mut().zip(src.pixel(x, first + i)) {
                    *d += w * v;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(n: usize) -> Image {
        Image::from_fn(n, n, 1, |x, y, p| p[0] = ((x + y) % 2) as f32).unwrap()
    }

    #[test]
    fn test_downsample_even_halves() {
        let image = Image::filled(8, 8, &[0.5, 0.5, 0.5]).unwrap();
        let out = downsample(&image, 4.0).unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
        assert_eq!(out.channels(), 3);
    }

    #[test]
    fn test_downsample_odd_rounds_up() {
        let image = Image::filled(9, 9, &[0.5]).unwrap();
        let out = downsample(&image, 4.0).unwrap();
        assert_eq!((out.width(), out.height()), (5, 5));
    }

    #[test]
    fn test_downsample_mixed_parity() {
        let image = Image::filled(6, 3, &[1.0]).unwrap();
        let out = downsample(&image, 2.0).unwrap();
        assert_eq!((out.width(), out.height()), (3, 2));
    }

    #[test]
    fn test_child_center() {
        assert_eq!(child_center(0, 8), 0.5);
        assert_eq!(child_center(3, 8), 6.5);
        assert_eq!(child_center(0, 9), 0.0);
        assert_eq!(child_center(4, 9), 8.0);
    }

    #[test]
    fn test_downsample_preserves_interior_constant() {
        // Far enough from the zero padding, a normalized kernel keeps a
        // constant signal unchanged.
        let image = Image::filled(32, 32, &[0.6]).unwrap();
        let out = downsample(&image, 4.0).unwrap();
        let v = out.pixel(8, 8)[0];
        assert!((v - 0.6).abs() < 1e-5, "interior value {}", v);
    }

    #[test]
    fn test_downsample_edges_fade_to_border() {
        let image = Image::filled(16, 16, &[1.0]).unwrap();
        let out = downsample(&image, 6.0).unwrap();
        assert!(out.pixel(0, 0)[0] < out.pixel(4, 4)[0]);
    }

    #[test]
    fn test_downsample_checkerboard_averages() {
        let out = downsample(&checkerboard(4), 4.0).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
        for y in 0..2 {
            for x in 0..2 {
                let v = out.pixel(x, y)[0];
                assert!((v - 0.5).abs() < 0.1, "pixel ({}, {}) = {}", x, y, v);
            }
        }
    }

    #[test]
    fn test_downsample_box_is_pair_average() {
        // A width-1 even kernel is a 2-tap box: each child is the mean of a
        // 2x2 parent block.
        let image = Image::from_fn(4, 2, 1, |x, y, p| p[0] = (x + 4 * y) as f32 / 8.0).unwrap();
        let out = downsample(&image, 1.0).unwrap();
        assert_eq!((out.width(), out.height()), (2, 1));

        let expected = (0.0 + 1.0 + 4.0 + 5.0) / 4.0 / 8.0;
        assert!((out.pixel(0, 0)[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_downsample_clamps() {
        // Sinc side lobes overshoot next to a hard edge.
        let image = Image::from_fn(16, 16, 1, |x, _, p| p[0] = if x < 8 { 1.0 } else { 0.0 }).unwrap();
        let out = downsample(&image, 8.0).unwrap();
        assert!(out.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_downsample_rejects_degenerate() {
        let image = Image::filled(1, 4, &[1.0]).unwrap();
        assert!(matches!(
            downsample(&image, 2.0),
            Err(TextureError::InvalidParameter(_))
        ));

        let image = Image::filled(4, 4, &[1.0]).unwrap();
        assert!(matches!(
            downsample(&image, 0.0),
            Err(TextureError::InvalidKernelWidth(_))
        ));
    }

    #[test]
    fn test_clipped_taps_stay_inside() {
        let kernel = make_kernel(4.0, Parity::Even);
        let profile = kernel.profile();

        // Fully inside
        let (first, taps) = clipped_taps(2, &kernel, 10);
        assert_eq!((first, taps), (2, profile));

        // Overhanging the left edge by one tap
        let (first, taps) = clipped_taps(-1, &kernel, 10);
        assert_eq!((first, taps), (0, &profile[1..]));

        // Overhanging the right edge
        let (first, taps) = clipped_taps(8, &kernel, 10);
        assert_eq!((first, taps), (8, &profile[..2]));

        // Entirely outside
        assert!(clipped_taps(-20, &kernel, 10).1.is_empty());
        assert!(clipped_taps(12, &kernel, 10).1.is_empty());
    }

    #[test]
    fn test_wide_kernel_matches_full_convolution() {
        let image = Image::from_fn(6, 5, 1, |x, y, p| p[0] = ((x * 3 + y * 5) % 7) as f32 / 7.0).unwrap();
        let width = 41.0;
        let out = downsample(&image, width).unwrap();

        // Reference: every tap of the full kernel, zero outside the image
        let kx = make_kernel(width, Parity::of_side(6));
        let ky = make_kernel(width, Parity::of_side(5));
        for cy in 0..out.height() {
            for cx in 0..out.width() {
                let sx = first_tap(cx, 6, &kx);
                let sy = first_tap(cy, 5, &ky);
                let mut expected = 0.0;
                for (j, wy) in ky.profile().iter().enumerate() {
                    for (i, wx) in kx.profile().iter().enumerate() {
                        if let Some(p) = image.get(sx + i as i64, sy + j as i64) {
                            expected += wx * wy * p[0];
                        }
                    }
                }
                let expected = expected.clamp(0.0, 1.0);
                let v = out.pixel(cx, cy)[0];
                assert!((v - expected).abs() < 1e-5, "({}, {}) = {} vs {}", cx, cy, v, expected);
            }
        }
    }

    #[test]
    fn test_huge_kernel_width_stays_in_range() {
        let image = Image::from_fn(16, 16, 1, |x, y, p| p[0] = ((x + y) % 2) as f32).unwrap();
        let out = downsample(&image, 2.0e6).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
        assert!(out.data().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }
}
