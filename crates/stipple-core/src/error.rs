//! Error taxonomy for filter configuration and invocation.

/// Errors raised before any pixel work begins.
///
/// Out-of-range lookups (histogram bins, colormap positions) are not errors;
/// they are reported through `Option` sentinels by the query functions.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid buffer dimensions {width}x{height} for {len} pixels")]
    InvalidDimensions { width: u32, height: u32, len: usize },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    #[error("failed to parse filter config: {0}")]
    Config(#[from] serde_json::Error),
}

impl FilterError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Fail with `InvalidParameter` unless `value` lies in `[lo, hi]`.
pub(crate) fn ensure_range(name: &'static str, value: f32, lo: f32, hi: f32) -> Result<(), FilterError> {
    if value.is_nan() || value < lo || value > hi {
        return Err(FilterError::invalid(name, format!("{value} is outside [{lo}, {hi}]")));
    }
    Ok(())
}

/// Fail with `InvalidParameter` unless `value` is finite and at least `lo`.
pub(crate) fn ensure_at_least(name: &'static str, value: f32, lo: f32) -> Result<(), FilterError> {
    if !value.is_finite() || value < lo {
        return Err(FilterError::invalid(name, format!("{value} must be at least {lo}")));
    }
    Ok(())
}

/// Fail with `InvalidParameter` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), FilterError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FilterError::invalid(name, format!("{value} must be positive")));
    }
    Ok(())
}
