use thiserror::Error;

use crate::http::HttpError;

/// Validation errors for user-supplied inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid indicator interval '{value}', expected one of daily, weekly, monthly")]
    InvalidInterval { value: String },
    #[error("invalid series type '{value}', expected one of open, high, low, close")]
    InvalidSeriesType { value: String },
}

/// Upstream/API error classification shared by the fetch client and the
/// normalizer. [`ApiError::retryable`] drives the per-URL retry loop.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("upstream returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("rate limited by upstream: {note}")]
    RateLimited { note: String },

    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected data series '{key}' missing from response")]
    MissingSeries { key: String },

    #[error("malformed payload: {reason}")]
    Malformed { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Default classification: transport failures, rate limiting, and
    /// 408/429/5xx statuses are worth retrying; structural errors are not.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Transport(error) => error.retryable(),
            Self::UpstreamStatus { status, .. } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
            Self::RateLimited { .. } => true,
            // A throttled upstream can answer 200 with an HTML body.
            Self::InvalidJson(_) => true,
            Self::RetriesExhausted { .. }
            | Self::MissingSeries { .. }
            | Self::Malformed { .. }
            | Self::Validation(_) => false,
        }
    }

    /// Stable machine-readable code for diagnostics.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "api.transport",
            Self::UpstreamStatus { .. } => "api.upstream_status",
            Self::RateLimited { .. } => "api.rate_limited",
            Self::RetriesExhausted { .. } => "api.retries_exhausted",
            Self::InvalidJson(_) => "api.invalid_json",
            Self::MissingSeries { .. } => "api.missing_series",
            Self::Malformed { .. } => "api.malformed",
            Self::Validation(_) => "api.validation",
        }
    }
}
