//! Stamp: blur, then threshold the RGB sum to black or white.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ensure_at_least, ensure_range};
use crate::filter::{self, PointFilter};
use crate::image::PixelBuffer;
use crate::math::{mix_colors, smooth_step};
use crate::pixel::Pixel;

use super::blur::GaussianBlur;

/// Stamp parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stamp {
    /// Brightness cut-off in `[0, 1]`. Default: 0.5.
    pub threshold: f32,
    /// Width of the soft transition around the threshold. Default: 0.
    pub softness: f32,
    /// Radius of the blur applied first. Default: 5.
    pub radius: f32,
}

impl Default for Stamp {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            softness: 0.0,
            radius: 5.0,
        }
    }
}

impl Stamp {
    pub fn validate(&self) -> Result<(), FilterError> {
        ensure_range("threshold", self.threshold, 0.0, 1.0)?;
        ensure_at_least("softness", self.softness, 0.0)?;
        GaussianBlur::new(self.radius).validate()
    }

    /// Blur `source`, then threshold every pixel.
    pub fn apply(&self, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
        let blurred = filter::whole(&GaussianBlur::new(self.radius), source)?;
        filter::point(&self.thresholds(), &blurred)
    }

    fn thresholds(&self) -> Threshold {
        Threshold {
            lower: 765.0 * (self.threshold - self.softness * 0.5),
            upper: 765.0 * (self.threshold + self.softness * 0.5),
        }
    }
}

/// Thresholds scaled to the `r + g + b` range.
struct Threshold {
    lower: f32,
    upper: f32,
}

impl PointFilter for Threshold {
    fn filter_rgb(&self, _x: u32, _y: u32, rgb: Pixel) -> Pixel {
        let f = smooth_step(self.lower, self.upper, rgb.rgb_sum() as f32);
        mix_colors(f, Pixel::BLACK, Pixel::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_stays_black() {
        let source = PixelBuffer::filled(4, 4, Pixel::BLACK).unwrap();
        let out = Stamp::default().apply(&source).unwrap();
        assert!(out.pixels.iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn test_bright_becomes_white() {
        let source = PixelBuffer::filled(5, 3, Pixel::rgb(200, 220, 180)).unwrap();
        let out = Stamp::default().apply(&source).unwrap();
        assert!(out.pixels.iter().all(|&p| p == Pixel::WHITE));
    }

    #[test]
    fn test_hard_threshold_without_blur() {
        let source =
            PixelBuffer::from_argb(3, 1, &[0xff7f_7f7f, 0xff80_8080, 0x0010_1010]).unwrap();
        let stamp = Stamp {
            radius: 0.0,
            ..Stamp::default()
        };
        let out = stamp.apply(&source).unwrap();
        // 381 < 382.5 ≤ 384
        assert_eq!(out.pixels, vec![Pixel::BLACK, Pixel::WHITE, Pixel::BLACK]);
    }

    #[test]
    fn test_softness_gives_gray() {
        let source = PixelBuffer::filled(1, 1, Pixel::rgb(128, 128, 127)).unwrap();
        let stamp = Stamp {
            radius: 0.0,
            softness: 0.2,
            ..Stamp::default()
        };
        let p = stamp.apply(&source).unwrap().pixels[0];
        assert!(p.red() > 100 && p.red() < 155, "{p:?}");
        assert_eq!(p.alpha(), 255);
    }

    #[test]
    fn test_threshold_domain() {
        let stamp = Stamp {
            threshold: 1.5,
            ..Stamp::default()
        };
        assert!(stamp.validate().is_err());

        let huge_blur = Stamp {
            radius: 5e8,
            ..Stamp::default()
        };
        assert!(matches!(
            huge_blur.validate(),
            Err(FilterError::InvalidParameter { name: "radius", .. })
        ));
    }
}
