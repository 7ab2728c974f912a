//! The single entry point: apply a configured filter to a pixel buffer.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::filter;
use crate::filters::{Emboss, GaussianBlur, Lookup, Marble, Oil, Pointillize, Sparkle, Stamp};
use crate::image::PixelBuffer;

/// A filter selection with its parameters.
///
/// Serialized with a `filter` tag and the parameters inline; omitted
/// parameters take their defaults:
/// ```json
/// { "filter": "oil", "range": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterConfig {
    Emboss(Emboss),
    Oil(Oil),
    Pointillize(Pointillize),
    Sparkle(Sparkle),
    Stamp(Stamp),
    Marble(Marble),
    Lookup(Lookup),
    GaussianBlur(GaussianBlur),
}

impl FilterConfig {
    /// Parse and validate a JSON filter config.
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<(), FilterError> {
        match self {
            Self::Emboss(p) => p.validate(),
            Self::Oil(p) => p.validate(),
            Self::Pointillize(p) => p.validate(),
            Self::Sparkle(p) => p.validate(),
            Self::Stamp(p) => p.validate(),
            Self::Marble(p) => p.validate(),
            Self::Lookup(p) => p.validate(),
            Self::GaussianBlur(p) => p.validate(),
        }
    }

    /// Tag name, as used in serialized configs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Emboss(_) => "emboss",
            Self::Oil(_) => "oil",
            Self::Pointillize(_) => "pointillize",
            Self::Sparkle(_) => "sparkle",
            Self::Stamp(_) => "stamp",
            Self::Marble(_) => "marble",
            Self::Lookup(_) => "lookup",
            Self::GaussianBlur(_) => "gaussian_blur",
        }
    }
}

/// Apply `config` to `source`, returning a new buffer.
///
/// The source and the parameters are validated before any pixel is touched;
/// on error nothing is produced. `source` is never modified.
pub fn apply(config: &FilterConfig, source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
    source.validate()?;
    config.validate()?;

    tracing::debug!(
        filter = config.name(),
        width = source.width,
        height = source.height,
        "applying filter"
    );

    let output = match config {
        FilterConfig::Emboss(p) => filter::whole(p, source)?,
        FilterConfig::Oil(p) => filter::whole(p, source)?,
        FilterConfig::Pointillize(p) => filter::whole(p, source)?,
        FilterConfig::GaussianBlur(p) => filter::whole(p, source)?,
        FilterConfig::Sparkle(p) => p.apply(source)?,
        FilterConfig::Stamp(p) => p.apply(source)?,
        FilterConfig::Marble(p) => p.apply(source)?,
        FilterConfig::Lookup(p) => p.apply(source)?,
    };

    tracing::trace!(
        filter = config.name(),
        out_width = output.width,
        out_height = output.height,
        "filter complete"
    );
    Ok(output)
}
