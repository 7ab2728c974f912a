//! Lookup: recolor each pixel through a colormap indexed by its brightness.

use serde::{Deserialize, Serialize};

use crate::colormap::{Colormap, Gradient, Knot};
use crate::error::FilterError;
use crate::filter::{self, PointFilter};
use crate::image::PixelBuffer;
use crate::pixel::Pixel;

/// Lookup parameters: a gradient given by its full knot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lookup {
    /// Knots including both sentinels. Default: black to white.
    pub knots: Vec<Knot>,
}

impl Default for Lookup {
    fn default() -> Self {
        Self {
            knots: Gradient::new().knots().to_vec(),
        }
    }
}

impl Lookup {
    pub fn gradient(&self) -> Result<Gradient, FilterError> {
        Gradient::from_knots(self.knots.clone())
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        self.gradient().map(|_| ())
    }

    pub fn apply(&self, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
        let gradient = self.gradient()?;
        filter::point(&ColormapFilter::new(gradient.colormap()), source)
    }
}

/// Maps brightness through any [`Colormap`], keeping the source alpha.
///
/// Wrap a [`SharedGradient`](crate::colormap::SharedGradient) snapshot to
/// render while an editor keeps changing the live gradient.
#[derive(Debug, Clone, Copy)]
pub struct ColormapFilter<'a, C: Colormap> {
    colormap: &'a C,
}

impl<'a, C: Colormap> ColormapFilter<'a, C> {
    pub fn new(colormap: &'a C) -> Self {
        Self { colormap }
    }
}

impl<C: Colormap> PointFilter for ColormapFilter<'_, C> {
    fn filter_rgb(&self, _x: u32, _y: u32, rgb: Pixel) -> Pixel {
        let v = rgb.brightness() as f32 / 255.0;
        self.colormap.get_color(v).with_alpha(rgb.alpha())
    }
}
