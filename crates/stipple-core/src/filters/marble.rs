//! Marble: a noise-driven displacement warp.
//!
//! # Algorithm
//! ```text
//! d      = clamp(⌊127·(1 + noise2(x / x_scale, y / x_scale))⌋, 0, 255)
//! θ_i    = 2π·i/256·turbulence
//! src    = (x − y_scale·sin θ_d,  y + y_scale·cos θ_d)
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ensure_at_least, ensure_positive};
use crate::filter::{self, EdgeAction, FilterContext, Interpolation, InverseMap};
use crate::image::PixelBuffer;
use crate::math::{TWO_PI, clamp_i32};
use crate::noise::{CoherentNoise, Perlin};

/// Marble parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marble {
    /// Horizontal and vertical scale of the noise field. Default: 4.
    pub x_scale: f32,
    /// Displacement distance in pixels. Default: 4.
    pub y_scale: f32,
    /// Number of turns the displacement angle makes across the noise range.
    /// Default: 1.
    pub turbulence: f32,
    /// Noise seed. Default: 0.
    pub seed: i32,
    /// Default: [`EdgeAction::Clamp`].
    pub edge_action: EdgeAction,
    /// Default: [`Interpolation::Bilinear`].
    pub interpolation: Interpolation,
}

impl Default for Marble {
    fn default() -> Self {
        Self {
            x_scale: 4.0,
            y_scale: 4.0,
            turbulence: 1.0,
            seed: 0,
            edge_action: EdgeAction::Clamp,
            interpolation: Interpolation::Bilinear,
        }
    }
}

impl Marble {
    pub fn validate(&self) -> Result<(), FilterError> {
        ensure_positive("x_scale", self.x_scale)?;
        ensure_at_least("y_scale", self.y_scale, 0.0)?;
        if !self.turbulence.is_finite() {
            return Err(FilterError::invalid("turbulence", "must be finite"));
        }
        Ok(())
    }

    pub fn apply(&self, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
        let ctx = FilterContext::new(source, self.edge_action, self.interpolation)?;
        filter::transform(&MarbleMap::new(self), source, &ctx)
    }
}

/// Precomputed displacement tables for one render.
struct MarbleMap {
    sin_table: [f32; 256],
    cos_table: [f32; 256],
    x_scale: f32,
    noise: Perlin,
}

impl MarbleMap {
    fn new(params: &Marble) -> Self {
        let mut sin_table = [0.0; 256];
        let mut cos_table = [0.0; 256];
        for i in 0..256 {
            let angle = TWO_PI * i as f32 / 256.0 * params.turbulence;
            sin_table[i] = -params.y_scale * angle.sin();
            cos_table[i] = params.y_scale * angle.cos();
        }
        Self {
            sin_table,
            cos_table,
            x_scale: params.x_scale,
            noise: Perlin::with_seed(params.seed),
        }
    }

    fn displacement(&self, x: u32, y: u32) -> usize {
        let n = self.noise.noise2(x as f32 / self.x_scale, y as f32 / self.x_scale);
        clamp_i32((127.0 * (1.0 + n)) as i32, 0, 255) as usize
    }
}

impl InverseMap for MarbleMap {
    fn transform_inverse(&self, x: u32, y: u32) -> Vec2 {
        let d = self.displacement(x, y);
        Vec2::new(x as f32 + self.sin_table[d], y as f32 + self.cos_table[d])
    }
}
