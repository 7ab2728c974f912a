//! Runtime configuration for the preview driver.

/// Default tracing filter when `STIPPLE_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";
/// Default suffix appended to the source file stem for previews.
const DEFAULT_OUTPUT_SUFFIX: &str = "_copy";

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `tracing-subscriber` env-filter directive.
    pub log_filter: String,
    /// Suffix for preview files: `<stem><suffix>.<ext>`.
    pub output_suffix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: std::env::var("STIPPLE_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned()),
            output_suffix: std::env::var("STIPPLE_OUTPUT_SUFFIX")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_OUTPUT_SUFFIX.to_owned()),
        }
    }
}
