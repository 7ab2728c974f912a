//! Packed 32-bit ARGB pixel representation.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A pixel packed as `0xAARRGGBB`, alpha in the most significant byte.
///
/// Serializes as its raw `u32`, so configs can write colors as
/// `4278190080` or, more readably, through [`Pixel::from_argb`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Pixel(pub u32);

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self(0xff00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xffff_ffff);

    /// Pack four channels.
    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Pack an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    /// Pack channels given as integers, clamping each to `[0, 255]` first.
    #[inline]
    pub fn from_clamped(a: i32, r: i32, g: i32, b: i32) -> Self {
        Self::from_argb(
            a.clamp(0, 255) as u8,
            r.clamp(0, 255) as u8,
            g.clamp(0, 255) as u8,
            b.clamp(0, 255) as u8,
        )
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Channels as `[a, r, g, b]`.
    #[inline]
    pub const fn channels(self) -> [u8; 4] {
        [self.alpha(), self.red(), self.green(), self.blue()]
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00ff_ffff) | ((alpha as u32) << 24))
    }

    /// Unweighted mean of the color channels.
    #[inline]
    pub const fn brightness(self) -> u8 {
        ((self.red() as u32 + self.green() as u32 + self.blue() as u32) / 3) as u8
    }

    /// Sum of the color channels, in `[0, 765]`.
    #[inline]
    pub const fn rgb_sum(self) -> u32 {
        self.red() as u32 + self.green() as u32 + self.blue() as u32
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel(#{:08x})", self.0)
    }
}

impl From<u32> for Pixel {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

impl From<Pixel> for u32 {
    fn from(pixel: Pixel) -> Self {
        pixel.0
    }
}
