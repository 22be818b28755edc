//! Float image storage for texture data.
//!
//! Pixels are tuples of `channels` f32 values, interleaved and stored in
//! row-major order. Values are expected in the [0, 1] range.

use crate::{TextureError, TextureResult};

/// A rectangular grid of channel tuples.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Image {
    /// Create an image from interleaved channel data.
    ///
    /// Fails if any dimension is zero or the data length does not equal
    /// `width * height * channels`.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f32>) -> TextureResult<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(TextureError::EmptyImage);
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(TextureError::ChannelMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create an image where every pixel has the same value.
    pub fn filled(width: usize, height: usize, pixel: &[f32]) -> TextureResult<Self> {
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width * height * pixel.len())
            .collect();
        Self::new(width, height, pixel.len(), data)
    }

    /// Create an image by evaluating `f(x, y, pixel)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, &mut [f32]),
    ) -> TextureResult<Self> {
        let mut image = Self::new(width, height, channels, vec![0.0; width * height * channels])?;
        for y in 0..height {
            for x in 0..width {
                f(x, y, image.pixel_mut(x, y));
            }
        }
        Ok(image)
    }

    /// All-zero image. Dimensions must already be known to be non-zero.
    pub(crate) fn zeroed(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of values per pixel
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Interleaved pixel data
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Channel tuple at integer coordinates.
    ///
    /// Panics if the coordinates are out of range.
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let idx = (y * self.width + x) * self.channels;
        &self.data[idx..idx + self.channels]
    }

    /// Mutable channel tuple at integer coordinates.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let idx = (y * self.width + x) * self.channels;
        &mut self.data[idx..idx + self.channels]
    }

    /// Channel tuple at signed coordinates, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<&[f32]> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixel(x as usize, y as usize))
    }

    /// Copy of the image surrounded by `border` zero-valued pixels per side.
    pub fn padded(&self, border: usize) -> Image {
        let mut out = Image::zeroed(
            self.width + 2 * border,
            self.height + 2 * border,
            self.channels,
        );
        let row_len = self.width * self.channels;
        for y in 0..self.height {
            let src = &self.data[y * row_len..(y + 1) * row_len];
            let start = ((y + border) * out.width + border) * self.channels;
            out.data[start..start + row_len].copy_from_slice(src);
        }
        out
    }

    /// Clamp every value into [0, 1].
    pub fn clamp_unit(&mut self) {
        for v in &mut self.data {
            *v = v.clamp(0.0, 1.0);
        }
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}
