//! Per-channel RGB histogram and summary statistics.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::image::{PixelBuffer, Rect};

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Histogram channel selector.
///
/// `Gray` is only meaningful for [`Histogram::min_value`] and
/// [`Histogram::max_value`], where it combines the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Red,
    Green,
    Blue,
    Gray,
}

impl Channel {
    fn rgb_index(self) -> Option<usize> {
        match self {
            Self::Red => Some(0),
            Self::Green => Some(1),
            Self::Blue => Some(2),
            Self::Gray => None,
        }
    }
}

/// Frequency table of a pixel region, computed once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin counts for `[R, G, B]`. Each `Vec` has 256 entries.
    bins: [Vec<u32>; 3],
    num_samples: u32,
    /// `[R, G, B, Gray]`.
    min_value: [u8; 4],
    max_value: [u8; 4],
    min_frequency: [u32; 3],
    max_frequency: [u32; 3],
    mean: [f32; 3],
    is_gray: bool,
}

impl Histogram {
    /// Histogram of the whole buffer.
    pub fn new(buffer: &PixelBuffer) -> Result<Self, FilterError> {
        Self::from_region(buffer, buffer.bounds())
    }

    /// Histogram of `region`, which must lie inside the buffer.
    ///
    /// Sample counts are `u32`, so a region of more than `u32::MAX` pixels is
    /// rejected.
    pub fn from_region(buffer: &PixelBuffer, region: Rect) -> Result<Self, FilterError> {
        buffer.validate()?;
        let num_samples = region.width.checked_mul(region.height).ok_or_else(|| {
            FilterError::invalid(
                "region",
                format!("{}x{} holds more than u32::MAX samples", region.width, region.height),
            )
        })?;
        let right = region.x.checked_add(region.width);
        let bottom = region.y.checked_add(region.height);
        match (right, bottom) {
            (Some(r), Some(b)) if r <= buffer.width && b <= buffer.height => {
                Ok(Self::scan(buffer, region, num_samples))
            }
            _ => Err(FilterError::invalid(
                "region",
                format!(
                    "{}x{} at ({}, {}) exceeds the {}x{} buffer",
                    region.width, region.height, region.x, region.y, buffer.width, buffer.height
                ),
            )),
        }
    }

    fn scan(buffer: &PixelBuffer, region: Rect, num_samples: u32) -> Self {
        let mut bins = [vec![0u32; BINS], vec![0u32; BINS], vec![0u32; BINS]];

        let stride = buffer.width as usize;
        for y in region.y..region.y + region.height {
            let start = y as usize * stride + region.x as usize;
            for p in &buffer.pixels[start..start + region.width as usize] {
                bins[0][p.red() as usize] += 1;
                bins[1][p.green() as usize] += 1;
                bins[2][p.blue() as usize] += 1;
            }
        }

        let is_gray = bins[0] == bins[1] && bins[1] == bins[2];

        let mut min_value = [0u8; 4];
        let mut max_value = [0u8; 4];
        let mut min_frequency = [0u32; 3];
        let mut max_frequency = [0u32; 3];
        let mut mean = [0.0f32; 3];

        for (c, channel) in bins.iter().enumerate() {
            if let Some(j) = channel.iter().position(|&n| n > 0) {
                min_value[c] = j as u8;
            }
            if let Some(j) = channel.iter().rposition(|&n| n > 0) {
                max_value[c] = j as u8;
            }
            min_frequency[c] = channel.iter().copied().min().unwrap_or(0);
            max_frequency[c] = channel.iter().copied().max().unwrap_or(0);

            if num_samples > 0 {
                let weighted: f64 = channel
                    .iter()
                    .enumerate()
                    .map(|(j, &n)| j as f64 * n as f64)
                    .sum();
                mean[c] = (weighted / num_samples as f64) as f32;
            }
        }
        min_value[3] = min_value[..3].iter().copied().min().unwrap_or(0);
        max_value[3] = max_value[..3].iter().copied().max().unwrap_or(0);

        tracing::trace!(num_samples, is_gray, "computed histogram");

        Self {
            bins,
            num_samples,
            min_value,
            max_value,
            min_frequency,
            max_frequency,
            mean,
            is_gray,
        }
    }

    pub fn num_samples(&self) -> u32 {
        self.num_samples
    }

    /// Count in bin `value` of `channel`.
    ///
    /// `None` when no samples were recorded, `channel` is `Gray`, or `value`
    /// is outside `[0, 255]`.
    pub fn frequency(&self, channel: Channel, value: i32) -> Option<u32> {
        if self.num_samples == 0 {
            return None;
        }
        let c = channel.rgb_index()?;
        let v = usize::try_from(value).ok()?;
        self.bins[c].get(v).copied()
    }

    /// All 256 bins of a color channel; `None` for `Gray`.
    pub fn bins(&self, channel: Channel) -> Option<&[u32]> {
        channel.rgb_index().map(|c| self.bins[c].as_slice())
    }

    /// Lowest value with a non-zero count (0 for an empty histogram).
    pub fn min_value(&self, channel: Channel) -> u8 {
        self.min_value[channel.rgb_index().unwrap_or(3)]
    }

    /// Highest value with a non-zero count (0 for an empty histogram).
    pub fn max_value(&self, channel: Channel) -> u8 {
        self.max_value[channel.rgb_index().unwrap_or(3)]
    }

    pub fn min_frequency(&self, channel: Channel) -> Option<u32> {
        channel.rgb_index().map(|c| self.min_frequency[c])
    }

    pub fn max_frequency(&self, channel: Channel) -> Option<u32> {
        channel.rgb_index().map(|c| self.max_frequency[c])
    }

    /// Frequency-weighted mean value; 0 for an empty histogram.
    pub fn mean(&self, channel: Channel) -> Option<f32> {
        channel.rgb_index().map(|c| self.mean[c])
    }

    /// True when the red, green and blue histograms are identical.
    pub fn is_gray(&self) -> bool {
        self.is_gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;

    const EPSILON: f32 = 1e-4;

    fn ramp() -> PixelBuffer {
        let pixels = (0..64u8)
            .map(|i| Pixel::rgb(i * 4, 255 - i, i / 2))
            .collect();
        PixelBuffer::new(8, 8, pixels).unwrap()
    }

    #[test]
    fn test_pure_red() {
        let buffer = PixelBuffer::filled(3, 2, Pixel::rgb(255, 0, 0)).unwrap();
        let h = Histogram::new(&buffer).unwrap();
        assert_eq!(h.num_samples(), 6);
        assert_eq!(h.min_value(Channel::Red), 255);
        assert_eq!(h.max_value(Channel::Red), 255);
        assert_eq!(h.min_value(Channel::Green), 0);
        assert_eq!(h.max_value(Channel::Green), 0);
        assert_eq!(h.min_value(Channel::Gray), 0);
        assert_eq!(h.max_value(Channel::Gray), 255);
        assert!(!h.is_gray());
        assert_eq!(h.frequency(Channel::Red, 255), Some(6));
        assert_eq!(h.max_frequency(Channel::Blue), Some(6));
        assert_eq!(h.min_frequency(Channel::Blue), Some(0));
        assert!((h.mean(Channel::Red).unwrap() - 255.0).abs() < EPSILON);
    }

    #[test]
    fn test_bins_sum_to_num_samples() {
        let buffer = ramp();
        let h = Histogram::new(&buffer).unwrap();
        for channel in [Channel::Red, Channel::Green, Channel::Blue] {
            let total: u32 = h.bins(channel).unwrap().iter().sum();
            assert_eq!(total, h.num_samples());
        }

        let region = Histogram::from_region(&buffer, Rect::new(2, 3, 4, 5)).unwrap();
        assert_eq!(region.num_samples(), 20);
        for channel in [Channel::Red, Channel::Green, Channel::Blue] {
            let total: u32 = region.bins(channel).unwrap().iter().sum();
            assert_eq!(total, 20);
        }
    }

    #[test]
    fn test_gray_detection() {
        let pixels = (0..16u8).map(|i| Pixel::rgb(i * 10, i * 10, i * 10)).collect();
        let buffer = PixelBuffer::new(4, 4, pixels).unwrap();
        let h = Histogram::new(&buffer).unwrap();
        assert!(h.is_gray());
        assert_eq!(h.min_value(Channel::Gray), 0);
        assert_eq!(h.max_value(Channel::Gray), 150);
        assert!((h.mean(Channel::Green).unwrap() - 75.0).abs() < EPSILON);
    }

    #[test]
    fn test_frequency_sentinels() {
        let h = Histogram::new(&ramp()).unwrap();
        assert_eq!(h.frequency(Channel::Gray, 10), None);
        assert_eq!(h.frequency(Channel::Red, -1), None);
        assert_eq!(h.frequency(Channel::Red, 256), None);
        assert!(h.frequency(Channel::Red, 0).is_some());
        assert_eq!(h.bins(Channel::Gray), None);
    }

    #[test]
    fn test_empty_region_reports_no_samples() {
        let h = Histogram::from_region(&ramp(), Rect::new(4, 4, 0, 3)).unwrap();
        assert_eq!(h.num_samples(), 0);
        assert_eq!(h.frequency(Channel::Red, 0), None);
        assert_eq!(h.mean(Channel::Red), Some(0.0));
        assert!(h.is_gray());
    }

    #[test]
    fn test_oversized_region_is_rejected() {
        let err = Histogram::from_region(&ramp(), Rect::new(0, 0, 70_000, 70_000)).unwrap_err();
        match err {
            FilterError::InvalidParameter { name: "region", reason } => {
                assert!(reason.contains("samples"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_inconsistent_buffer_is_rejected() {
        let buffer = PixelBuffer {
            width: 1 << 16,
            height: 1 << 16,
            pixels: Vec::new(),
        };
        assert!(matches!(
            Histogram::new(&buffer),
            Err(FilterError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_region_outside_buffer_is_rejected() {
        let err = Histogram::from_region(&ramp(), Rect::new(6, 0, 4, 1)).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { name: "region", .. }));
        assert!(Histogram::from_region(&ramp(), Rect::new(u32::MAX, 0, 2, 1)).is_err());
    }
}
