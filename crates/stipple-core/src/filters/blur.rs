//! Separable Gaussian blur.
//!
//! # Algorithm
//! ```text
//! r      = ceil(radius)
//! σ      = radius / 3
//! k(d)   = exp(−d² / 2σ²) / √(2πσ)    for d² ≤ radius², else 0
//! ```
//! The kernel is normalized to sum to 1 and applied horizontally then
//! vertically on premultiplied pixels, clamping at the edges.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ensure_range};
use crate::filter::WholeImageFilter;
use crate::math::{clamp_channel, premultiply_slice, unpremultiply_slice};
use crate::pixel::Pixel;

/// Largest accepted blur radius, in pixels.
pub const MAX_RADIUS: f32 = 1000.0;

/// Gaussian blur parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianBlur {
    /// Blur radius in pixels; 0 leaves the image unchanged. Default: 5.
    pub radius: f32,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self { radius: 5.0 }
    }
}

impl GaussianBlur {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        ensure_range("radius", self.radius, 0.0, MAX_RADIUS)
    }

    /// Normalized weights for offsets `-r..=r`.
    pub fn kernel(&self) -> Vec<f32> {
        let radius = self.radius;
        let r = radius.ceil() as i32;
        let sigma = radius / 3.0;
        let sigma22 = 2.0 * sigma * sigma;
        let sqrt_sigma_pi2 = (2.0 * std::f32::consts::PI * sigma).sqrt();
        let radius2 = radius * radius;

        let mut weights: Vec<f32> = (-r..=r)
            .map(|d| {
                let distance = (d * d) as f32;
                if distance > radius2 {
                    0.0
                } else {
                    (-distance / sigma22).exp() / sqrt_sigma_pi2
                }
            })
            .collect();
        let total: f32 = weights.iter().sum();
        weights.iter_mut().for_each(|w| *w /= total);
        weights
    }
}

/// Convolve one line of `len` pixels read through `at`, clamping at the ends.
fn convolve_line(kernel: &[f32], len: usize, at: impl Fn(usize) -> Pixel, out: &mut Vec<Pixel>) {
    let half = (kernel.len() / 2) as i64;
    for i in 0..len as i64 {
        let mut sum = [0.0f32; 4];
        for (k, &weight) in kernel.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let j = (i + k as i64 - half).clamp(0, len as i64 - 1) as usize;
            let c = at(j).channels();
            for ch in 0..4 {
                sum[ch] += weight * c[ch] as f32;
            }
        }
        let [a, r, g, b] = sum.map(|v| clamp_channel((v + 0.5) as i32));
        out.push(Pixel::from_argb(a, r, g, b));
    }
}

impl WholeImageFilter for GaussianBlur {
    fn filter_pixels(&self, width: u32, height: u32, input: &[Pixel]) -> Vec<Pixel> {
        if self.radius <= 0.0 {
            return input.to_vec();
        }
        let kernel = self.kernel();
        let (w, h) = (width as usize, height as usize);

        let mut src = input.to_vec();
        premultiply_slice(&mut src);

        let mut rows = Vec::with_capacity(src.len());
        for y in 0..h {
            let row = &src[y * w..(y + 1) * w];
            convolve_line(&kernel, w, |x| row[x], &mut rows);
        }

        // Column pass produces a transposed buffer; write it back row-major.
        let mut columns = Vec::with_capacity(src.len());
        for x in 0..w {
            convolve_line(&kernel, h, |y| rows[y * w + x], &mut columns);
        }
        let mut out = vec![Pixel::TRANSPARENT; src.len()];
        for x in 0..w {
            for y in 0..h {
                out[y * w + x] = columns[x * h + y];
            }
        }

        unpremultiply_slice(&mut out);
        out
    }
}
