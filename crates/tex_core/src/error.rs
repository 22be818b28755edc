//! Error type shared by the texture engine crates.

use thiserror::Error;

/// Errors that can occur while building or configuring a texture.
///
/// Degenerate filter geometry is not an error: filters return the boundary
/// value instead so callers evaluating many samples are never interrupted.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Invalid kernel width: {0} (must be positive and finite)")]
    InvalidKernelWidth(f32),

    #[error("Unknown level selection method: {0:?}")]
    UnknownLevelMethod(String),

    #[error("Channel count mismatch: expected {expected} values, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Image has no pixels or no channels")]
    EmptyImage,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Validate a kernel width supplied by configuration.
pub fn check_kernel_width(width: f32) -> TextureResult<f32> {
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(TextureError::InvalidKernelWidth(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_kernel_width() {
        assert_eq!(check_kernel_width(4.0).unwrap(), 4.0);
        assert!(matches!(
            check_kernel_width(0.0),
            Err(TextureError::InvalidKernelWidth(_))
        ));
        assert!(check_kernel_width(-2.0).is_err());
        assert!(check_kernel_width(f32::NAN).is_err());
        assert!(check_kernel_width(f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = TextureError::ChannelMismatch {
            expected: 12,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "Channel count mismatch: expected 12 values, got 9"
        );

        let err = TextureError::UnknownLevelMethod("maxAniso".to_string());
        assert!(err.to_string().contains("\"maxAniso\""));
    }
}
