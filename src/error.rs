//! Error types for the data and configuration layers.

use thiserror::Error;

/// Failures while obtaining or deriving market data.
///
/// None of these ever reach the end user: the pipeline swallows them and
/// substitutes the fallback bundle, recording [`DataError::kind`] in the
/// snapshot provenance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("upstream rate limited: {0}")]
    RateLimited(String),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("fetch timed out after {0}ms")]
    Timeout(u64),
}

impl DataError {
    /// Stable label used in logs, metrics and provenance.
    pub fn kind(&self) -> &'static str {
        match self {
            DataError::InsufficientData(_) => "insufficient_data",
            DataError::RateLimited(_) => "rate_limited",
            DataError::MalformedResponse(_) => "malformed_response",
            DataError::Transport(_) => "transport",
            DataError::Timeout(_) => "timeout",
        }
    }

    /// Transport failures are the only ones worth retrying against the same source.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::Transport(_))
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::MalformedResponse(err.to_string())
        } else {
            DataError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("refresh interval must be a positive number of milliseconds, got {0}")]
    InvalidRefreshInterval(u64),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
