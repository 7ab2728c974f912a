//! Emboss: shade a brightness bump map under a directional light.
//!
//! # Algorithm
//! The bump height of a pixel is its brightness. For every interior pixel the
//! surface normal comes from the 3×3 neighbourhood:
//! ```text
//! Nx = Σ left column − Σ right column
//! Ny = Σ bottom row − Σ top row
//! Nz = 6·255 / bump_height
//! shade = N·L / |N|          (0 when N·L < 0, Lz when Nx = Ny = 0)
//! ```
//! `L` is the light vector from azimuth/elevation scaled by 255.9. Border
//! pixels get the flat-surface shade `Lz`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ensure_positive};
use crate::filter::WholeImageFilter;
use crate::pixel::Pixel;

const PIXEL_SCALE: f32 = 255.9;

/// Emboss parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emboss {
    /// Scale the source color by the shade instead of producing gray relief.
    /// Default: `false`.
    pub emboss: bool,
    /// Light direction in the image plane, degrees. Default: 135.
    pub azimuth: f32,
    /// Light elevation above the image plane, degrees. Default: 30.
    pub elevation: f32,
    /// Apparent bump height; larger values flatten the relief. Default: 3.
    pub bump_height: f32,
}

impl Default for Emboss {
    fn default() -> Self {
        Self {
            emboss: false,
            azimuth: 135.0,
            elevation: 30.0,
            bump_height: 3.0,
        }
    }
}

impl Emboss {
    pub fn validate(&self) -> Result<(), FilterError> {
        ensure_positive("bump_height", self.bump_height)?;
        if !self.azimuth.is_finite() || !self.elevation.is_finite() {
            return Err(FilterError::invalid("azimuth", "light angles must be finite"));
        }
        Ok(())
    }

    /// Integer light vector `(Lx, Ly, Lz)`.
    fn light(&self) -> [i32; 3] {
        let (az, el) = (self.azimuth.to_radians(), self.elevation.to_radians());
        let l = Vec3::new(az.cos() * el.cos(), az.sin() * el.cos(), el.sin()) * PIXEL_SCALE;
        [l.x as i32, l.y as i32, l.z as i32]
    }

    /// `Nz` for the bump height. Small heights give very large values, so the
    /// shading math stays in `f64`.
    fn normal_z(&self) -> f64 {
        (6.0 * 255.0 / self.bump_height as f64).trunc()
    }

    fn shade(&self, nx: i32, ny: i32, light: [i32; 3], nz: f64) -> i32 {
        let [lx, ly, lz] = light;
        if nx == 0 && ny == 0 {
            return lz;
        }
        let (nx, ny) = (nx as f64, ny as f64);
        let n_dot_l = nx * lx as f64 + ny * ly as f64 + nz * lz as f64;
        if n_dot_l < 0.0 {
            return 0;
        }
        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        (n_dot_l / len) as i32
    }
}

impl WholeImageFilter for Emboss {
    fn filter_pixels(&self, width: u32, height: u32, input: &[Pixel]) -> Vec<Pixel> {
        let (w, h) = (width as usize, height as usize);
        let bump: Vec<i32> = input.iter().map(|p| p.brightness() as i32).collect();
        let light = self.light();
        let nz = self.normal_z();

        let mut out = Vec::with_capacity(input.len());
        for y in 0..h {
            for x in 0..w {
                let shade = if x > 0 && x + 1 < w && y > 0 && y + 1 < h {
                    let top = (y - 1) * w + x;
                    let mid = y * w + x;
                    let bottom = (y + 1) * w + x;
                    let nx = bump[top - 1] + bump[mid - 1] + bump[bottom - 1]
                        - bump[top + 1]
                        - bump[mid + 1]
                        - bump[bottom + 1];
                    let ny = bump[bottom - 1] + bump[bottom] + bump[bottom + 1]
                        - bump[top - 1]
                        - bump[top]
                        - bump[top + 1];
                    self.shade(nx, ny, light, nz)
                } else {
                    light[2]
                };
                let shade = shade.clamp(0, 255);

                let p = input[y * w + x];
                out.push(if self.emboss {
                    let scale = |c: u8| ((c as i32 * shade) >> 8) as u8;
                    Pixel::from_argb(p.alpha(), scale(p.red()), scale(p.green()), scale(p.blue()))
                } else {
                    let s = shade as u8;
                    Pixel::rgb(s, s, s)
                });
            }
        }
        out
    }
}
