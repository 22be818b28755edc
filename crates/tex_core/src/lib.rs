//! Tex Core - Images, filter kernels and mipmap pyramids.
//!
//! This crate provides:
//!
//! - **Image storage**: `Image`, a float grid of channel tuples
//! - **Kernels**: windowed-sinc `Kernel`s of even or odd parity
//! - **Pyramids**: `downsample` and `MipmapPyramid` with exact sub-pixel
//!   alignment between levels
//! - **File IO**: loading and saving through the `image` crate
//!
//! # Example
//!
//! ```ignore
//! use tex_core::{io::load_image, MipmapPyramid};
//!
//! let image = load_image("checker.png")?;
//! let pyramid = MipmapPyramid::build(&image, 4.0)?;
//! println!("{} levels", pyramid.num_levels());
//! let rgb = pyramid.level_clamped(2).sample_bilinear(0.5, 0.5);
//! ```

pub mod downsample;
pub mod error;
pub mod image;
pub mod io;
pub mod kernel;
pub mod pyramid;

// Re-export commonly used types
pub use crate::image::Image;
pub use downsample::downsample;
pub use error::{TextureError, TextureResult};
pub use kernel::{make_kernel, make_kernel_with_spacing, Kernel, Parity};
pub use pyramid::{MipLevel, MipmapPyramid};

/// Build a mipmap pyramid from a source image.
///
/// Shorthand for [`MipmapPyramid::build`].
pub fn build_pyramid(image: &Image, kernel_width: f32) -> TextureResult<MipmapPyramid> {
    MipmapPyramid::build(image, kernel_width)
}
