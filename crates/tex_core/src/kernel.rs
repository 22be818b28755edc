//! Windowed-sinc filter kernels for mipmap downsampling.
//!
//! A kernel is square and separable: the 2D weights are the outer product of
//! one normalized 1D profile with itself. Two parities exist because levels
//! alternate between aligned and offset sampling grids. An even kernel is
//! centred between two input samples and filters an even-sized side; an odd
//! kernel is centred on a sample and filters an odd-sized side.

use std::f32::consts::PI;

/// Default distance between zero crossings of the sinc profile, in input
/// pixels. Spacing 2 is the band limit of a factor-of-two decimation.
pub const DEFAULT_ZERO_CROSSING_SPACING: f32 = 2.0;

/// Tap-count parity of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Parity matching an image side length.
    pub fn of_side(side: usize) -> Self {
        if side % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Number of taps for a requested filter width in pixels.
    pub fn num_points(self, width: f32) -> usize {
        match self {
            Parity::Even => {
                let n = 2.0 * ((width + 1.0) / 2.0).floor();
                (n.max(2.0)) as usize
            }
            Parity::Odd => {
                let n = 2.0 * (width / 2.0).floor() + 1.0;
                (n.max(3.0)) as usize
            }
        }
    }
}

/// A normalized separable 2D filter kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    profile: Vec<f32>,
    parity: Parity,
}

impl Kernel {
    /// Normalized 1D profile; sums to 1.
    pub fn profile(&self) -> &[f32] {
        &self.profile
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Number of taps along one axis.
    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Offset of tap 0 from the kernel centre, in input pixels.
    ///
    /// Tap `i` sits at `first_tap_offset() + i`.
    pub fn first_tap_offset(&self) -> f32 {
        -((self.profile.len() - 1) as f32) / 2.0
    }
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[inline]
fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-8 {
        1.0
    } else {
        let pi_x = PI * x;
        pi_x.sin() / pi_x
    }
}

/// Build a kernel of the given width and parity with the default zero
/// crossing spacing.
pub fn make_kernel(width: f32, parity: Parity) -> Kernel {
    make_kernel_with_spacing(width, parity, DEFAULT_ZERO_CROSSING_SPACING)
}

/// Build a windowed-sinc kernel.
///
/// The sinc is sampled at unit-spaced taps centred on the kernel, stretched
/// so its zeros fall `spacing` pixels apart, and tapered by a raised cosine
/// that reaches zero half a tap beyond the outermost tap.
pub fn make_kernel_with_spacing(width: f32, parity: Parity, spacing: f32) -> Kernel {
    let n = parity.num_points(width);
    let half_extent = n as f32 / 2.0;
    let first = -((n - 1) as f32) / 2.0;

    let raw: Vec<f32> = (0..n)
        .map(|i| {
            let x = first + i as f32;
            let window = 0.5 * (1.0 + (PI * x / half_extent).cos());
            sinc(x / spacing) * window
        })
        .collect();

    // The 2D sum is the square of the 1D sum, so normalizing the profile
    // normalizes the outer product.
    let sum: f32 = raw.iter().sum();
    let profile = raw.into_iter().map(|w| w / sum).collect();

    Kernel { profile, parity }
}
