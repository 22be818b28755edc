//! Texture map facade: pyramid + level selection + filtering.
//!
//! Every lookup evaluates the one or two pyramid levels bracketing the
//! continuous level and blends them by its fractional part.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tex_core::{Image, MipLevel, MipmapPyramid, TextureError, TextureResult};
use tex_math::{Mat2, Vec2};

use crate::ewa::write_ewa;
use crate::level::{calculate_level, clamp_level};
use crate::sampler::accumulate_bilinear;
use crate::stochastic::write_quad_af;
use crate::{Footprint, TextureConfig, UniformSource};

/// Reconstruction strategy for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMethod {
    /// Bilinear lookup at the footprint center
    #[default]
    Trilinear,
    /// Monte Carlo average over the footprint quad
    QuadAf,
    /// Elliptical Gaussian over the footprint
    Ewa,
}

impl FilterMethod {
    pub const ALL: [FilterMethod; 3] = [FilterMethod::Trilinear, FilterMethod::QuadAf, FilterMethod::Ewa];

    pub fn name(self) -> &'static str {
        match self {
            FilterMethod::Trilinear => "trilinear",
            FilterMethod::QuadAf => "quadAf",
            FilterMethod::Ewa => "ewa",
        }
    }
}

impl fmt::Display for FilterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterMethod {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterMethod::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| TextureError::InvalidParameter(format!("unknown filter method {:?}", s)))
    }
}

/// Per-lookup screen-space information used by EWA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRequest {
    pixel_delta: Vec2,
    jacobian: Option<Mat2>,
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            pixel_delta: Vec2::ONE,
            jacobian: None,
        }
    }
}

impl FilterRequest {
    /// Request with an output pixel of `pixel_delta` screen units and an
    /// optional analytic texture-to-screen Jacobian.
    pub fn new(pixel_delta: Vec2, jacobian: Option<Mat2>) -> TextureResult<Self> {
        if !pixel_delta.is_finite() || pixel_delta.cmple(Vec2::ZERO).any() {
            return Err(TextureError::InvalidParameter(format!(
                "pixel delta must be positive, got ({}, {})",
                pixel_delta.x, pixel_delta.y
            )));
        }
        Ok(Self {
            pixel_delta,
            jacobian,
        })
    }

    pub fn pixel_delta(&self) -> Vec2 {
        self.pixel_delta
    }

    pub fn jacobian(&self) -> Option<Mat2> {
        self.jacobian
    }
}

/// A filtered texture: immutable once built, shareable across threads.
#[derive(Debug, Clone)]
pub struct TextureMap {
    pyramid: MipmapPyramid,
    config: TextureConfig,
}

impl TextureMap {
    /// Validate `config` and build the full pyramid for `image`.
    pub fn new(image: &Image, config: TextureConfig) -> TextureResult<Self> {
        config.validate()?;
        let pyramid = MipmapPyramid::build(image, config.kernel_width)?;

        log::info!(
            "Built texture map: {}x{}, {} channels, {} levels ({:.1} KB), level method {}",
            image.width(),
            image.height(),
            image.channels(),
            pyramid.num_levels(),
            pyramid.size_bytes() as f32 / 1024.0,
            config.level_method
        );

        Ok(Self { pyramid, config })
    }

    pub fn pyramid(&self) -> &MipmapPyramid {
        &self.pyramid
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn channels(&self) -> usize {
        self.pyramid.channels()
    }

    pub fn num_levels(&self) -> usize {
        self.pyramid.num_levels()
    }

    /// Continuous level for `footprint` under the configured method.
    pub fn level_for(&self, footprint: &Footprint) -> f32 {
        calculate_level(&self.pyramid, footprint, self.config.level_method)
    }

    /// Evaluate `eval` on the levels bracketing `level` and blend.
    ///
    /// `eval` overwrites a buffer of [`channels`](Self::channels) values.
    fn blend_levels(&self, level: f32, out: &mut [f32], mut eval: impl FnMut(&MipLevel, &mut [f32])) {
        let level = clamp_level(level, self.pyramid.num_levels());
        let lower = level.floor() as usize;
        let t = level - lower as f32;

        eval(self.pyramid.level_clamped(lower), out);
        if t > 0.0 && lower + 1 < self.pyramid.num_levels() {
            let mut upper = vec![0.0; out.len()];
            eval(self.pyramid.level_clamped(lower + 1), &mut upper);
            for (o, u) in out.iter_mut().zip(&upper) {
                *o += t * (u - *o);
            }
        }
    }

    /// Bilinear lookup at the footprint center, blended across levels.
    pub fn filter_trilinear(&self, footprint: &Footprint) -> Vec<f32> {
        self.filter_trilinear_at_level(self.level_for(footprint), footprint)
    }

    pub fn filter_trilinear_at_level(&self, level: f32, footprint: &Footprint) -> Vec<f32> {
        let mut out = vec![0.0; self.channels()];
        let center = footprint.center();
        self.blend_levels(level, &mut out, |l, o| {
            o.fill(0.0);
            accumulate_bilinear(l, l.to_raster(center), 1.0, o);
        });
        out
    }

    /// Stochastic quad filter with the configured sample count.
    pub fn filter_quad_af<S: UniformSource + ?Sized>(&self, footprint: &Footprint, rng: &mut S) -> Vec<f32> {
        self.filter_quad_af_at_level(self.level_for(footprint), footprint, rng)
    }

    pub fn filter_quad_af_at_level<S: UniformSource + ?Sized>(
        &self,
        level: f32,
        footprint: &Footprint,
        rng: &mut S,
    ) -> Vec<f32> {
        let mut out = vec![0.0; self.channels()];
        let samples = self.config.quad_samples;
        self.blend_levels(level, &mut out, |l, o| {
            write_quad_af(l, footprint.quad(), samples, &mut *rng, o)
        });
        out
    }

    /// EWA filter; `jacobian` maps texture coordinates to screen units in
    /// which one output pixel measures `pixel_delta`.
    pub fn filter_ewa(&self, footprint: &Footprint, pixel_delta: Vec2, jacobian: Option<Mat2>) -> Vec<f32> {
        self.filter_ewa_at_level(self.level_for(footprint), footprint, pixel_delta, jacobian)
    }

    pub fn filter_ewa_at_level(
        &self,
        level: f32,
        footprint: &Footprint,
        pixel_delta: Vec2,
        jacobian: Option<Mat2>,
    ) -> Vec<f32> {
        let mut out = vec![0.0; self.channels()];
        let params = &self.config.ewa;
        self.blend_levels(level, &mut out, |l, o| {
            write_ewa(l, footprint.quad(), pixel_delta, jacobian, params, o)
        });
        out
    }

    /// Dispatch on `method`. `rng` is only drawn from by [`FilterMethod::QuadAf`].
    pub fn filter<S: UniformSource + ?Sized>(
        &self,
        method: FilterMethod,
        footprint: &Footprint,
        request: &FilterRequest,
        rng: &mut S,
    ) -> Vec<f32> {
        self.filter_at_level(method, self.level_for(footprint), footprint, request, rng)
    }

    pub fn filter_at_level<S: UniformSource + ?Sized>(
        &self,
        method: FilterMethod,
        level: f32,
        footprint: &Footprint,
        request: &FilterRequest,
        rng: &mut S,
    ) -> Vec<f32> {
        match method {
            FilterMethod::Trilinear => self.filter_trilinear_at_level(level, footprint),
            FilterMethod::QuadAf => self.filter_quad_af_at_level(level, footprint, rng),
            FilterMethod::Ewa => {
                self.filter_ewa_at_level(level, footprint, request.pixel_delta, request.jacobian)
            }
        }
    }
}
