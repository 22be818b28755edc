//! Mipmap pyramid with exact sub-pixel alignment.
//!
//! Every level keeps an affine raster transform from texture coordinates
//! `(s, t)` in `[0, 1]^2` to its own pixel grid:
//!
//! ```text
//! raster = raster_scale * st + raster_offset
//! ```
//!
//! Level 0 maps `s = 1` exactly onto the last pixel index. Downsampling an
//! even side puts the child's pixel 0 half a parent pixel to the right of the
//! parent's pixel 0; the offset records that shift so a texture coordinate
//! hits the same point of the image on every level.
//!
//! Level images are stored with a one-pixel zero border. Bilinear lookups near
//! the edge therefore fade to 0 (clamp-to-border with border color 0).

use tex_math::{Rect, Vec2};

use crate::downsample::{downsample, reduced_side};
use crate::error::check_kernel_width;
use crate::{Image, TextureError, TextureResult};

/// Width of the zero border around every stored level image.
pub const BORDER: usize = 1;

/// One level of a mipmap pyramid.
#[derive(Clone, Debug)]
pub struct MipLevel {
    /// Level image including the zero border
    image: Image,

    /// Position of texture coordinate (0, 0) in this level's pixels
    raster_offset: Vec2,

    /// Raster distance covered by a unit step in texture coordinates
    raster_scale: Vec2,
}

impl MipLevel {
    fn new(image: &Image, raster_offset: Vec2, raster_scale: Vec2) -> Self {
        Self {
            image: image.padded(BORDER),
            raster_offset,
            raster_scale,
        }
    }

    /// Stored image, including the one-pixel zero border.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Width without the border.
    pub fn width(&self) -> usize {
        self.image.width() - 2 * BORDER
    }

    /// Height without the border.
    pub fn height(&self) -> usize {
        self.image.height() - 2 * BORDER
    }

    pub fn channels(&self) -> usize {
        self.image.channels()
    }

    pub fn raster_offset(&self) -> Vec2 {
        self.raster_offset
    }

    pub fn raster_scale(&self) -> Vec2 {
        self.raster_scale
    }

    /// Texture coordinates to padded raster coordinates (border included).
    #[inline]
    pub fn to_raster(&self, st: Vec2) -> Vec2 {
        self.raster_scale * st + self.raster_offset + Vec2::splat(BORDER as f32)
    }

    /// Extent of the stored pixel centres in padded raster coordinates.
    pub fn padded_bounds(&self) -> Rect {
        Rect::from_points(
            Vec2::ZERO,
            Vec2::new(
                (self.image.width() - 1) as f32,
                (self.image.height() - 1) as f32,
            ),
        )
    }

    /// Stored pixel at padded integer coordinates, `None` outside.
    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> Option<&[f32]> {
        self.image.get(x, y)
    }

    /// Fail unless `out` holds exactly one channel tuple of this level.
    pub fn check_channels(&self, out: &[f32]) -> TextureResult<()> {
        if out.len() != self.channels() {
            return Err(TextureError::ChannelMismatch {
                expected: self.channels(),
                actual: out.len(),
            });
        }
        Ok(())
    }

    /// Stored texels and weights of the bilinear stencil at padded raster
    /// coordinates `p`.
    ///
    /// Taps outside the stored image and taps of zero weight are skipped, so
    /// a non-finite `p` yields nothing.
    pub fn bilinear_taps(&self, p: Vec2) -> impl Iterator<Item = (&[f32], f32)> + '_ {
        let taps = if p.is_finite() {
            let x0 = p.x.floor();
            let y0 = p.y.floor();
            let fx = p.x - x0;
            let fy = p.y - y0;
            let (x0, y0) = (x0 as i64, y0 as i64);
            [
                (x0, y0, (1.0 - fx) * (1.0 - fy)),
                (x0 + 1, y0, fx * (1.0 - fy)),
                (x0, y0 + 1, (1.0 - fx) * fy),
                (x0 + 1, y0 + 1, fx * fy),
            ]
        } else {
            [(0, 0, 0.0); 4]
        };

        taps.into_iter()
            .filter(|&(_, _, w)| w != 0.0)
            .filter_map(move |(x, y, w)| self.texel(x, y).map(|texel| (texel, w)))
    }

    /// Add `weight` times the bilinear lookup at `p` to `out`.
    fn accumulate_raster(&self, p: Vec2, weight: f32, out: &mut [f32]) {
        for (texel, w) in self.bilinear_taps(p) {
            for (o, v) in out.iter_mut().zip(texel) {
                *o += weight * w * v;
            }
        }
    }

    /// Bilinear lookup at padded raster coordinates, written into `out`.
    ///
    /// Taps outside the stored image contribute 0. `out` must hold
    /// [`channels`](Self::channels) values.
    pub fn sample_raster_into(&self, p: Vec2, out: &mut [f32]) -> TextureResult<()> {
        self.check_channels(out)?;
        out.fill(0.0);
        self.accumulate_raster(p, 1.0, out);
        Ok(())
    }

    /// Bilinear lookup at padded raster coordinates.
    pub fn sample_raster(&self, p: Vec2) -> Vec<f32> {
        let mut out = vec![0.0; self.channels()];
        self.accumulate_raster(p, 1.0, &mut out);
        out
    }

    /// Bilinear lookup at texture coordinates, written into `out`.
    pub fn sample_bilinear_into(&self, s: f32, t: f32, out: &mut [f32]) -> TextureResult<()> {
        self.sample_raster_into(self.to_raster(Vec2::new(s, t)), out)
    }

    /// Bilinear lookup at texture coordinates.
    pub fn sample_bilinear(&self, s: f32, t: f32) -> Vec<f32> {
        self.sample_raster(self.to_raster(Vec2::new(s, t)))
    }

    /// Bilinear lookups for many texture coordinates.
    pub fn sample_bilinear_batch(&self, points: &[Vec2]) -> Vec<Vec<f32>> {
        points
            .iter()
            .map(|st| self.sample_bilinear(st.x, st.y))
            .collect()
    }
}

/// Immutable sequence of mip levels, finest first.
#[derive(Clone, Debug)]
pub struct MipmapPyramid {
    levels: Vec<MipLevel>,
}

/// Running construction state; lives only inside [`MipmapPyramid::build`].
struct Reduction {
    image: Image,
    /// Level-0 position of the current level's pixel 0
    offset: Vec2,
    /// Level-0 distance between neighbouring pixels of the current level
    delta: f32,
}

impl Reduction {
    fn can_reduce(&self) -> bool {
        self.image.width() > 1 && self.image.height() > 1
    }

    fn next(self, kernel_width: f32) -> TextureResult<Reduction> {
        let shift = |side: usize| if side % 2 == 0 { self.delta / 2.0 } else { 0.0 };
        let offset = self.offset + Vec2::new(shift(self.image.width()), shift(self.image.height()));
        let image = downsample(&self.image, kernel_width)?;
        debug_assert_eq!(image.width(), reduced_side(self.image.width()));

        Ok(Reduction {
            image,
            offset,
            delta: self.delta * 2.0,
        })
    }

    fn level(&self, base_scale: Vec2) -> MipLevel {
        MipLevel::new(&self.image, -self.offset / self.delta, base_scale / self.delta)
    }
}

impl MipmapPyramid {
    /// Build the full pyramid from a source image.
    ///
    /// Levels are produced until either side reaches one pixel.
    pub fn build(image: &Image, kernel_width: f32) -> TextureResult<Self> {
        let kernel_width = check_kernel_width(kernel_width)?;
        let base_scale = Vec2::new(
            (image.width() - 1) as f32,
            (image.height() - 1) as f32,
        );

        let mut state = Reduction {
            image: image.clone(),
            offset: Vec2::ZERO,
            delta: 1.0,
        };
        let mut levels = vec![state.level(base_scale)];

        while state.can_reduce() {
            state = state.next(kernel_width)?;
            let level = state.level(base_scale);
            log::debug!(
                "Built mip level {}: {}x{}, offset ({:.4}, {:.4}), scale ({:.4}, {:.4})",
                levels.len(),
                level.width(),
                level.height(),
                level.raster_offset.x,
                level.raster_offset.y,
                level.raster_scale.x,
                level.raster_scale.y
            );
            levels.push(level);
        }

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Level by index, `None` past the coarsest level.
    pub fn level(&self, index: usize) -> Option<&MipLevel> {
        self.levels.get(index)
    }

    /// Level by index, clamped to the coarsest level.
    pub fn level_clamped(&self, index: usize) -> &MipLevel {
        &self.levels[index.min(self.levels.len() - 1)]
    }

    /// Number of levels (always at least one).
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn channels(&self) -> usize {
        self.levels[0].channels()
    }

    /// Level-0 raster scale: texture units to full-resolution pixels.
    pub fn base_scale(&self) -> Vec2 {
        self.levels[0].raster_scale
    }

    /// Total stored size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.levels.iter().map(|l| l.image.size_bytes()).sum()
    }
}
