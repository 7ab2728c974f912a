//! Filter execution strategies and the engine that drives them.
//!
//! A filter is one of three shapes:
//! - [`InverseMap`]: maps each output coordinate back to a source coordinate,
//!   which the engine resamples (geometric filters).
//! - [`WholeImageFilter`]: sees the entire source at once and produces the
//!   entire destination (neighbourhood or global effects).
//! - [`PointFilter`]: maps each pixel independently of its neighbours.
//!
//! Every entry point validates the source first and returns a freshly
//! allocated buffer; sources are never mutated.

pub mod transform;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::image::PixelBuffer;
use crate::math::{clamp_i32, modulo};
use crate::pixel::Pixel;

pub use transform::transform;

/// How reads outside the source buffer are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAction {
    /// Transparent black.
    Zero,
    /// Nearest in-bounds pixel, alpha included.
    Clamp,
    /// Toroidal wraparound.
    Wrap,
    /// Nearest in-bounds pixel with alpha forced to 0, so blending against
    /// the border does not produce a gray halo.
    #[default]
    RgbClamp,
}

/// Resampling used by [`transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Truncate the source coordinate toward zero.
    NearestNeighbour,
    /// Blend the four surrounding pixels.
    #[default]
    Bilinear,
}

/// Fixed configuration of one filter invocation over one source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    pub width: u32,
    pub height: u32,
    pub edge_action: EdgeAction,
    pub interpolation: Interpolation,
}

impl FilterContext {
    /// Context for `source`; fails if the buffer is empty or inconsistent.
    pub fn new(
        source: &PixelBuffer,
        edge_action: EdgeAction,
        interpolation: Interpolation,
    ) -> Result<Self, FilterError> {
        source.validate()?;
        Ok(Self {
            width: source.width,
            height: source.height,
            edge_action,
            interpolation,
        })
    }

    #[inline]
    pub(crate) fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`, resolving off-buffer reads by the edge action.
    #[inline]
    pub fn pixel(&self, pixels: &[Pixel], x: i32, y: i32) -> Pixel {
        let (w, h) = (self.width as i32, self.height as i32);
        if x < 0 || x >= w || y < 0 || y >= h {
            self.edge_pixel(pixels, x, y)
        } else {
            pixels[self.index(x, y)]
        }
    }

    pub(crate) fn edge_pixel(&self, pixels: &[Pixel], x: i32, y: i32) -> Pixel {
        let (w, h) = (self.width as i32, self.height as i32);
        match self.edge_action {
            EdgeAction::Zero => Pixel::TRANSPARENT,
            EdgeAction::Wrap => pixels[self.index(modulo(x, w), modulo(y, h))],
            EdgeAction::Clamp => pixels[self.index(clamp_i32(x, 0, w - 1), clamp_i32(y, 0, h - 1))],
            EdgeAction::RgbClamp => {
                pixels[self.index(clamp_i32(x, 0, w - 1), clamp_i32(y, 0, h - 1))].with_alpha(0)
            }
        }
    }
}

/// A geometric filter expressed as an inverse coordinate mapping.
pub trait InverseMap {
    /// Output dimensions for a `width` x `height` source.
    fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width, height)
    }

    /// Source coordinate that supplies output pixel `(x, y)`. May be
    /// fractional and may fall outside the source.
    fn transform_inverse(&self, x: u32, y: u32) -> Vec2;
}

/// A filter that needs the whole source buffer to produce its output.
pub trait WholeImageFilter {
    /// Produce `width * height` output pixels from the source pixels.
    fn filter_pixels(&self, width: u32, height: u32, input: &[Pixel]) -> Vec<Pixel>;
}

/// A filter applied to each pixel in isolation.
pub trait PointFilter {
    fn filter_rgb(&self, x: u32, y: u32, rgb: Pixel) -> Pixel;
}

/// Run a [`WholeImageFilter`] over `source`.
pub fn whole(filter: &impl WholeImageFilter, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
    source.validate()?;
    let output = filter.filter_pixels(source.width, source.height, &source.pixels);
    PixelBuffer::new(source.width, source.height, output)
}

/// Run a [`PointFilter`] over every pixel of `source`.
pub fn point(filter: &impl PointFilter, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
    source.validate()?;
    let width = source.width as usize;
    let pixels = source
        .pixels
        .iter()
        .enumerate()
        .map(|(i, &p)| filter.filter_rgb((i % width) as u32, (i / width) as u32, p))
        .collect();
    PixelBuffer::new(source.width, source.height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height).map(|i| Pixel(0xff00_0000 | i)).collect();
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    fn context(source: &PixelBuffer, edge_action: EdgeAction) -> FilterContext {
        FilterContext::new(source, edge_action, Interpolation::NearestNeighbour).unwrap()
    }

    #[test]
    fn test_edge_actions() {
        let source = numbered(3, 2);
        let px = &source.pixels;

        let zero = context(&source, EdgeAction::Zero);
        assert_eq!(zero.pixel(px, -1, 0), Pixel::TRANSPARENT);
        assert_eq!(zero.pixel(px, 2, 1), Pixel(0xff00_0005));

        let clamp = context(&source, EdgeAction::Clamp);
        assert_eq!(clamp.pixel(px, -4, 7), Pixel(0xff00_0003));
        assert_eq!(clamp.pixel(px, 9, -1), Pixel(0xff00_0002));

        let wrap = context(&source, EdgeAction::Wrap);
        assert_eq!(wrap.pixel(px, -1, 0), Pixel(0xff00_0002));
        assert_eq!(wrap.pixel(px, 3, 3), Pixel(0xff00_0003));

        let rgb_clamp = context(&source, EdgeAction::RgbClamp);
        assert_eq!(rgb_clamp.pixel(px, 5, 0), Pixel(0x0000_0002));
        assert_eq!(rgb_clamp.pixel(px, 1, 1), Pixel(0xff00_0004));
    }

    #[test]
    fn test_context_rejects_empty_source() {
        let source = PixelBuffer {
            width: 0,
            height: 2,
            pixels: Vec::new(),
        };
        let err = FilterContext::new(&source, EdgeAction::Zero, Interpolation::Bilinear).unwrap_err();
        assert!(matches!(err, FilterError::InvalidDimensions { .. }));
    }

    struct Invert;

    impl PointFilter for Invert {
        fn filter_rgb(&self, _x: u32, _y: u32, rgb: Pixel) -> Pixel {
            Pixel(rgb.0 ^ 0x00ff_ffff)
        }
    }

    struct Mirror;

    impl WholeImageFilter for Mirror {
        fn filter_pixels(&self, width: u32, _height: u32, input: &[Pixel]) -> Vec<Pixel> {
            input
                .chunks(width as usize)
                .flat_map(|row| row.iter().rev().copied())
                .collect()
        }
    }

    #[test]
    fn test_point_visits_every_pixel() {
        let source = numbered(4, 3);
        let out = point(&Invert, &source).unwrap();
        assert_eq!(out.get(3, 2), Some(Pixel(0xffff_fff4)));
        assert_eq!(source.get(3, 2), Some(Pixel(0xff00_000b)));
    }

    #[test]
    fn test_whole_passes_full_buffer() {
        let source = numbered(3, 2);
        let out = whole(&Mirror, &source).unwrap();
        assert_eq!(out.get(0, 0), source.get(2, 0));
        assert_eq!(out.get(0, 1), source.get(2, 1));
    }
}
