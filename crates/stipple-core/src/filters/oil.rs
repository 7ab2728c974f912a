//! Oil painting: a per-channel mode filter.
//!
//! Each output channel is the mean of the most populated intensity bucket in
//! the `(2·range + 1)²` window around the pixel. The window is clipped to the
//! image, and ties go to the lowest bucket. Alpha is copied from the source.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::filter::WholeImageFilter;
use crate::pixel::Pixel;

/// Oil parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Oil {
    /// Window half-width in pixels. Default: 3.
    pub range: u32,
    /// Number of intensity buckets, `1..=256`. Default: 256.
    pub levels: u32,
}

impl Default for Oil {
    fn default() -> Self {
        Self {
            range: 3,
            levels: 256,
        }
    }
}

impl Oil {
    pub fn validate(&self) -> Result<(), FilterError> {
        if !(1..=256).contains(&self.levels) {
            return Err(FilterError::invalid(
                "levels",
                format!("{} is outside [1, 256]", self.levels),
            ));
        }
        Ok(())
    }
}

/// Count and channel sum per bucket, for one channel.
struct Buckets {
    count: Vec<u32>,
    total: Vec<u32>,
}

impl Buckets {
    fn new(levels: usize) -> Self {
        Self {
            count: vec![0; levels],
            total: vec![0; levels],
        }
    }

    fn clear(&mut self) {
        self.count.fill(0);
        self.total.fill(0);
    }

    fn add(&mut self, value: u8, levels: usize) {
        let bucket = value as usize * levels / 256;
        self.count[bucket] += 1;
        self.total[bucket] += value as u32;
    }

    /// Mean of the fullest bucket.
    fn mode(&self) -> u8 {
        let mut best = 0;
        for i in 1..self.count.len() {
            if self.count[i] > self.count[best] {
                best = i;
            }
        }
        self.total[best].checked_div(self.count[best]).unwrap_or(0) as u8
    }
}

impl WholeImageFilter for Oil {
    fn filter_pixels(&self, width: u32, height: u32, input: &[Pixel]) -> Vec<Pixel> {
        let levels = self.levels.clamp(1, 256) as usize;
        let (w, h) = (width as i64, height as i64);
        let range = self.range as i64;
        let mut channels = [Buckets::new(levels), Buckets::new(levels), Buckets::new(levels)];

        let mut out = Vec::with_capacity(input.len());
        for y in 0..h {
            for x in 0..w {
                channels.iter_mut().for_each(Buckets::clear);

                for iy in (y - range).max(0)..=(y + range).min(h - 1) {
                    for ix in (x - range).max(0)..=(x + range).min(w - 1) {
                        let p = input[(iy * w + ix) as usize];
                        channels[0].add(p.red(), levels);
                        channels[1].add(p.green(), levels);
                        channels[2].add(p.blue(), levels);
                    }
                }

                let alpha = input[(y * w + x) as usize].alpha();
                let [r, g, b] = [channels[0].mode(), channels[1].mode(), channels[2].mode()];
                out.push(Pixel::from_argb(alpha, r, g, b));
            }
        }
        out
    }
}
