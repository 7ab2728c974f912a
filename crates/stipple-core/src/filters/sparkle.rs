//! Sparkle: a star of randomized rays blended over the image.
//!
//! # Algorithm
//! Ray `i` gets length `radius + randomness/100 · radius · N(0, 1)` from a
//! seeded generator. For a pixel at squared distance `D` and angle `θ` from
//! the centre:
//! ```text
//! d = (θ + π) / 2π · rays,   i = ⌊d⌋,   f = d − i
//! L = lerp(f, len_i, len_{i+1})
//! g = (L² / (D + 0.0001)) ^ ((100 − amount) / 50)
//! t = clamp((1 − (f − ½)²) · g, 0, 1)
//! out = mix(t, pixel, color)
//! ```

use std::f32::consts::PI;

use nanorand::WyRand;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ensure_at_least, ensure_range};
use crate::filter::{self, PointFilter};
use crate::image::PixelBuffer;
use crate::math::{TWO_PI, clamp, lerp, mix_colors};
use crate::noise::next_gaussian;
use crate::pixel::Pixel;

/// Largest accepted ray count.
pub const MAX_RAYS: u32 = 10_000;

/// Sparkle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sparkle {
    /// Number of rays. Default: 50.
    pub rays: u32,
    /// Mean ray length in pixels. Default: 25.
    pub radius: f32,
    /// Ray length spread as a percentage of `radius`. Default: 25.
    pub randomness: f32,
    /// Brightness falloff, `[0, 100]`; higher reaches further. Default: 50.
    pub amount: f32,
    /// Color the rays blend toward. Default: opaque white.
    pub color: Pixel,
    /// Centre as a fraction of the image width. Default: 0.5.
    pub centre_x: f32,
    /// Centre as a fraction of the image height. Default: 0.5.
    pub centre_y: f32,
    /// Seed for the ray lengths. Default: 371.
    pub seed: u64,
}

impl Default for Sparkle {
    fn default() -> Self {
        Self {
            rays: 50,
            radius: 25.0,
            randomness: 25.0,
            amount: 50.0,
            color: Pixel::WHITE,
            centre_x: 0.5,
            centre_y: 0.5,
            seed: 371,
        }
    }
}

impl Sparkle {
    pub fn validate(&self) -> Result<(), FilterError> {
        if !(1..=MAX_RAYS).contains(&self.rays) {
            return Err(FilterError::invalid(
                "rays",
                format!("{} is outside [1, {MAX_RAYS}]", self.rays),
            ));
        }
        ensure_at_least("radius", self.radius, 0.0)?;
        ensure_range("randomness", self.randomness, 0.0, 100.0)?;
        ensure_range("amount", self.amount, 0.0, 100.0)?;
        ensure_range("centre_x", self.centre_x, 0.0, 1.0)?;
        ensure_range("centre_y", self.centre_y, 0.0, 1.0)
    }

    pub fn apply(&self, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
        source.validate()?;
        filter::point(&self.rays_for(source.width, source.height), source)
    }

    /// Lay out the rays for a `width` x `height` image.
    fn rays_for(&self, width: u32, height: u32) -> Rays {
        let mut rng = WyRand::new_seed(self.seed);
        let spread = self.randomness / 100.0 * self.radius;
        let lengths = (0..self.rays)
            .map(|_| self.radius + spread * next_gaussian(&mut rng) as f32)
            .collect();
        Rays {
            lengths,
            centre: (
                (self.centre_x * width as f32) as i32,
                (self.centre_y * height as f32) as i32,
            ),
            radius: self.radius,
            exponent: (100.0 - self.amount) / 50.0,
            color: self.color,
        }
    }
}

/// Ray lengths laid out for one image size.
struct Rays {
    lengths: Vec<f32>,
    centre: (i32, i32),
    radius: f32,
    exponent: f32,
    color: Pixel,
}

impl PointFilter for Rays {
    fn filter_rgb(&self, x: u32, y: u32, rgb: Pixel) -> Pixel {
        let n = self.lengths.len();
        let dx = (x as i32 - self.centre.0) as f32;
        let dy = (y as i32 - self.centre.1) as f32;
        let distance = dx * dx + dy * dy;
        let d = (dy.atan2(dx) + PI) / TWO_PI * n as f32;
        let i = d as usize;
        let mut f = d - i as f32;

        if self.radius != 0.0 {
            let length = lerp(f, self.lengths[i % n], self.lengths[(i + 1) % n]);
            let g = (length * length / (distance + 0.0001)).powf(self.exponent);
            f -= 0.5;
            f = (1.0 - f * f) * g;
        }
        mix_colors(clamp(f, 0.0, 1.0), rgb, self.color)
    }
}
