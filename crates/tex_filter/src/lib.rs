//! Tex Filter - Anisotropic texture filtering over mipmap pyramids.
//!
//! Given the texture-space footprint of an output pixel, a [`TextureMap`]
//! picks a pyramid level and reconstructs a filtered value with one of:
//!
//! - **Trilinear**: bilinear lookups blended between two levels
//! - **Stochastic quad**: Monte Carlo average over the footprint
//! - **EWA**: elliptical Gaussian derived from the footprint's Jacobian
//!
//! # Example
//!
//! ```ignore
//! use tex_filter::{Footprint, TextureConfig, TextureMap, Vec2};
//!
//! let map = TextureMap::new(&image, TextureConfig::default())?;
//! let fp = Footprint::from_box(Vec2::new(0.5, 0.5), Vec2::new(0.01, 0.002));
//! let rgb = map.filter_ewa(&fp, Vec2::ONE, None);
//! ```

pub mod batch;
mod config;
pub mod ewa;
mod footprint;
pub mod level;
mod sampler;
pub mod stochastic;
mod texture_map;

pub use batch::{filter_batch, filter_batch_into};
pub use config::TextureConfig;
pub use ewa::{ewa_weights, filter_ewa, EwaParams, EwaWindow, BOUNDARY_VALUE};
pub use footprint::Footprint;
pub use level::{calculate_level, LevelMethod};
pub use sampler::UniformSource;
pub use stochastic::{filter_quad_af, filter_quad_af_weighted};
pub use texture_map::{FilterMethod, FilterRequest, TextureMap};

/// Re-export the core types callers need alongside the filters
pub use tex_core::{Image, MipLevel, MipmapPyramid, TextureError, TextureResult};
pub use tex_math::{Mat2, Quad, Vec2};
