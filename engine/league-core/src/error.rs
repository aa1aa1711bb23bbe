//! Error types for upstream providers

use thiserror::Error;

/// Failures surfaced by calendar, roster and statistics providers
///
/// Variants carry messages rather than source errors so one failure can be
/// cloned out to every caller waiting on the same request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Upstream returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed upstream payload from {source_name}: {message}")]
    UpstreamFormat { source_name: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No data source available: {0}")]
    Unavailable(String),
}

impl ProviderError {
    pub fn format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::UpstreamFormat { source_name: source_name.into(), message: message.into() }
    }

    /// Only transport-level failures are worth a second attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Transport { .. })
    }
}
