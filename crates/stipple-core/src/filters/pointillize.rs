//! Pointillize: paint each cell of a cellular field with one source color.
//!
//! # Algorithm
//! Output pixel `(x, y)` is rotated by `-angle`, divided by `scale` (and by
//! `scale · stretch` vertically) and offset by 1000 cells to keep away from
//! the origin. The nearest feature point `f1` picks the source pixel
//! `clamp((f1 − 1000) · scale)`. Then either
//! ```text
//! fade_edges:  out = mix(½·d1/d2, color(f1), color(f2))
//! otherwise:   out = mix(1 − smooth_step(t, t + fuzziness, d1), edge_color, color(f1))
//! ```

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ensure_at_least, ensure_positive, ensure_range};
use crate::filter::WholeImageFilter;
use crate::math::{mix_colors, smooth_step};
use crate::pixel::Pixel;

use super::cellular::{CellularField, GridType};

/// Offset that keeps sample coordinates away from the field origin.
const ORIGIN_OFFSET: f32 = 1000.0;

/// Pointillize parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pointillize {
    /// Cell size in pixels. Default: 16.
    pub scale: f32,
    /// Feature point jitter in cells, `[0, 1]`. Default: 0.
    pub randomness: f32,
    /// Grid rotation in degrees. Default: 0.
    pub angle: f32,
    /// Vertical cell stretch. Default: 1.
    pub stretch: f32,
    /// Default: [`GridType::Hexagonal`].
    pub grid: GridType,
    /// Distance from the feature point at which the edge color starts, in
    /// cells. Default: 0.4.
    pub edge_thickness: f32,
    /// Width of the transition into the edge color. Default: 0.1.
    pub fuzziness: f32,
    /// Blend neighbouring cells instead of drawing edges. Default: `false`.
    pub fade_edges: bool,
    /// Default: opaque black.
    pub edge_color: Pixel,
    /// Seed for feature point placement. Default: 0.
    pub seed: u64,
}

impl Default for Pointillize {
    fn default() -> Self {
        Self {
            scale: 16.0,
            randomness: 0.0,
            angle: 0.0,
            stretch: 1.0,
            grid: GridType::Hexagonal,
            edge_thickness: 0.4,
            fuzziness: 0.1,
            fade_edges: false,
            edge_color: Pixel::BLACK,
            seed: 0,
        }
    }
}

impl Pointillize {
    pub fn validate(&self) -> Result<(), FilterError> {
        ensure_positive("scale", self.scale)?;
        ensure_range("randomness", self.randomness, 0.0, 1.0)?;
        ensure_positive("stretch", self.stretch)?;
        ensure_at_least("edge_thickness", self.edge_thickness, 0.0)?;
        ensure_at_least("fuzziness", self.fuzziness, 0.0)?;
        if !self.angle.is_finite() {
            return Err(FilterError::invalid("angle", "must be finite"));
        }
        Ok(())
    }

    fn field(&self) -> CellularField {
        CellularField::new(self.grid, self.randomness, self.seed)
    }

    /// Source pixel under a feature point.
    fn source_color(&self, position: Vec2, width: u32, height: u32, input: &[Pixel]) -> Pixel {
        let sx = (((position.x - ORIGIN_OFFSET) * self.scale) as i32).clamp(0, width as i32 - 1);
        let sy = (((position.y - ORIGIN_OFFSET) * self.scale) as i32).clamp(0, height as i32 - 1);
        input[sy as usize * width as usize + sx as usize]
    }
}

impl WholeImageFilter for Pointillize {
    fn filter_pixels(&self, width: u32, height: u32, input: &[Pixel]) -> Vec<Pixel> {
        let field = self.field();
        let rotation = Mat2::from_angle(-self.angle.to_radians());
        let scale = Vec2::new(self.scale, self.scale * self.stretch);

        let mut out = Vec::with_capacity(input.len());
        for y in 0..height {
            for x in 0..width {
                let p = rotation * Vec2::new(x as f32, y as f32) / scale + ORIGIN_OFFSET;
                let [f1, f2] = field.nearest(p);
                let v = self.source_color(f1.position, width, height, input);

                out.push(if self.fade_edges {
                    let v2 = self.source_color(f2.position, width, height, input);
                    let t = if f2.distance > 0.0 && f2.distance.is_finite() {
                        0.5 * f1.distance / f2.distance
                    } else {
                        0.0
                    };
                    mix_colors(t, v, v2)
                } else {
                    let t = 1.0
                        - smooth_step(
                            self.edge_thickness,
                            self.edge_thickness + self.fuzziness,
                            f1.distance,
                        );
                    mix_colors(t, self.edge_color, v)
                });
            }
        }
        out
    }
}
