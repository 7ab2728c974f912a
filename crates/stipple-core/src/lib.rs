//! Stipple Core: pixel-level image filters.
//!
//! This crate contains the pixel model, numeric helpers, colormaps,
//! histograms, the filter execution strategies and the concrete filters.
//! No file formats, GUI or persistence.

pub mod colormap;
pub mod engine;
pub mod error;
pub mod filter;
pub mod filters;
pub mod histogram;
pub mod image;
pub mod math;
pub mod noise;
pub mod pixel;

// Re-exports for convenience.
pub use colormap::{Colormap, Gradient, SharedGradient};
pub use engine::{FilterConfig, apply};
pub use error::FilterError;
pub use filter::{EdgeAction, Interpolation};
pub use histogram::{Channel, Histogram};
pub use image::{PixelBuffer, Rect};
pub use pixel::Pixel;
