//! Reading and writing texture images through the `image` crate.
//!
//! Decoded pixels are normalized to [0, 1] floats and keep the source channel
//! count (gray, gray + alpha, RGB or RGBA). No color space conversion is
//! applied; values are filtered as stored.

use std::path::Path;

use image::ColorType;

use crate::{Image, TextureError, TextureResult};

/// Load an image file as a float [`Image`].
pub fn load_image(path: impl AsRef<Path>) -> TextureResult<Image> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let channels = img.color().channel_count() as usize;
    let rgba = img.to_rgba32f();
    let (width, height) = rgba.dimensions();

    // Channels of the RGBA expansion to keep for each source layout
    let keep: &[usize] = match channels {
        1 => &[0],
        2 => &[0, 3],
        3 => &[0, 1, 2],
        4 => &[0, 1, 2, 3],
        n => {
            return Err(TextureError::UnsupportedFormat(format!(
                "{} channels in {}",
                n,
                path.display()
            )))
        }
    };

    let data: Vec<f32> = rgba
        .pixels()
        .flat_map(|p| keep.iter().map(move |&c| p[c].clamp(0.0, 1.0)))
        .collect();

    let image = Image::new(width as usize, height as usize, keep.len(), data)?;

    log::debug!(
        "Loaded image: {} ({}x{}, {} channels, {:.1} KB)",
        path.display(),
        image.width(),
        image.height(),
        image.channels(),
        image.size_bytes() as f32 / 1024.0
    );

    Ok(image)
}

/// Save an [`Image`] with 8 bits per channel. The format follows the file
/// extension.
pub fn save_image(image: &Image, path: impl AsRef<Path>) -> TextureResult<()> {
    let path = path.as_ref();
    let color = match image.channels() {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => {
            return Err(TextureError::UnsupportedFormat(format!(
                "cannot save {} channels",
                n
            )))
        }
    };

    let bytes: Vec<u8> = image.data().iter().map(|&v| quantize(v)).collect();
    image::save_buffer(
        path,
        &bytes,
        image.width() as u32,
        image.height() as u32,
        color,
    )?;

    log::debug!("Saved image: {}", path.display());
    Ok(())
}

/// [0, 1] float to 8-bit, rounding to nearest.
fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
