//! Texture map configuration.

use serde::{Deserialize, Serialize};
use tex_core::error::check_kernel_width;
use tex_core::TextureResult;

use crate::{EwaParams, LevelMethod};

/// Settings for building and filtering a [`crate::TextureMap`].
///
/// Serialized field names are camelCase, e.g.
/// `{"kernelWidth": 8.0, "levelMethod": "minDiag"}`. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextureConfig {
    /// Downsampling filter width in pixels
    pub kernel_width: f32,
    /// Level selection heuristic
    pub level_method: LevelMethod,
    /// Samples per stochastic quad lookup
    pub quad_samples: usize,
    /// EWA filter constants
    pub ewa: EwaParams,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            kernel_width: 4.0,
            level_method: LevelMethod::MinQuadWidth,
            quad_samples: 16,
            ewa: EwaParams::default(),
        }
    }
}

impl TextureConfig {
    pub fn with_kernel_width(mut self, width: f32) -> Self {
        self.kernel_width = width;
        self
    }

    pub fn with_level_method(mut self, method: LevelMethod) -> Self {
        self.level_method = method;
        self
    }

    pub fn with_quad_samples(mut self, samples: usize) -> Self {
        self.quad_samples = samples;
        self
    }

    pub fn with_ewa(mut self, ewa: EwaParams) -> Self {
        self.ewa = ewa;
        self
    }

    /// Reject settings no texture map can be built with.
    pub fn validate(&self) -> TextureResult<()> {
        check_kernel_width(self.kernel_width)?;
        self.ewa.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tex_core::TextureError;

    #[test]
    fn test_default_config() {
        let config = TextureConfig::default();
        assert_eq!(config.kernel_width, 4.0);
        assert_eq!(config.level_method, LevelMethod::MinQuadWidth);
        assert_eq!(config.quad_samples, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TextureConfig::default()
            .with_kernel_width(8.0)
            .with_level_method(LevelMethod::Trilinear)
            .with_quad_samples(64)
            .with_ewa(EwaParams::default().with_cutoff(2.0));
        assert_eq!(config.kernel_width, 8.0);
        assert_eq!(config.level_method, LevelMethod::Trilinear);
        assert_eq!(config.quad_samples, 64);
        assert_eq!(config.ewa.cutoff, 2.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = TextureConfig::default().with_kernel_width(0.0);
        assert!(matches!(config.validate(), Err(TextureError::InvalidKernelWidth(_))));

        let config = TextureConfig::default().with_ewa(EwaParams::default().with_cutoff(-1.0));
        assert!(matches!(config.validate(), Err(TextureError::InvalidParameter(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = TextureConfig::default()
            .with_kernel_width(6.0)
            .with_level_method(LevelMethod::MinSideLen);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kernelWidth\":6.0"));
        assert!(json.contains("\"levelMethod\":\"minSideLen\""));

        let back: TextureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_partial_and_unknown_method() {
        let config: TextureConfig =
            serde_json::from_str(r#"{"levelMethod": "level0", "ewa": {"cutoff": 3.0}}"#).unwrap();
        assert_eq!(config.level_method, LevelMethod::Level0);
        assert_eq!(config.kernel_width, 4.0);
        assert_eq!(config.ewa.cutoff, 3.0);
        assert_eq!(config.ewa.variance_st, EwaParams::default().variance_st);

        let result = serde_json::from_str::<TextureConfig>(r#"{"levelMethod": "fastest"}"#);
        assert!(result.is_err());
    }
}
