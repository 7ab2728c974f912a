//! Pixel buffer representation for the filter pipeline.

use std::fmt;

use crate::error::FilterError;
use crate::pixel::Pixel;

/// A rectangular region of a buffer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Width/height-tagged packed-ARGB pixels, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// `width * height` pixels, row-major.
    pub pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Wrap existing pixels, checking that the dimensions describe them.
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, FilterError> {
        let buffer = Self { width, height, pixels };
        buffer.validate()?;
        Ok(buffer)
    }

    /// A buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Pixel) -> Result<Self, FilterError> {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    /// Wrap raw `0xAARRGGBB` words.
    pub fn from_argb(width: u32, height: u32, argb: &[u32]) -> Result<Self, FilterError> {
        let pixels: &[Pixel] = bytemuck::cast_slice(argb);
        Self::new(width, height, pixels.to_vec())
    }

    /// The pixels as raw `0xAARRGGBB` words.
    pub fn as_argb(&self) -> &[u32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Check the buffer is non-empty, `pixels` has `width * height` entries
    /// and that count fits in a `u32`.
    pub fn validate(&self) -> Result<(), FilterError> {
        let expected = self.width as usize * self.height as usize;
        if self.width == 0
            || self.height == 0
            || self.width.checked_mul(self.height).is_none()
            || self.pixels.len() != expected
        {
            return Err(FilterError::InvalidDimensions {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// The whole buffer as a region.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Convert from an 8-bit RGBA image.
    pub fn from_rgba_image(image: &::image::RgbaImage) -> Result<Self, FilterError> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| Pixel::from_argb(p.0[3], p.0[0], p.0[1], p.0[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Convert to an 8-bit RGBA image.
    pub fn to_rgba_image(&self) -> ::image::RgbaImage {
        ::image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(y * self.width + x) as usize];
            ::image::Rgba([p.red(), p.green(), p.blue(), p.alpha()])
        })
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}
