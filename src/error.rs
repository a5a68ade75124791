//! Errors surfaced by a price refresh.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of fetching and decoding a ticker payload.
///
/// A refresh that returns any of these leaves the stored quotation untouched.
#[derive(Debug, Error)]
pub enum PriceError {
    /// The request could not be built or completed (timeout, DNS, refused connection).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a status outside `200..=299`.
    #[error("ticker endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body could not be drained.
    #[error("failed to read response body: {0}")]
    Read(#[from] std::io::Error),

    /// The body is not JSON or does not match the ticker schema.
    #[error("failed to parse ticker payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed but carries no quotation for the requested currency.
    #[error("ticker payload has no quotation for {0}")]
    MissingCurrency(String),
}

impl PriceError {
    /// True for errors raised before any bytes were decoded.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PriceError::Network(_) | PriceError::Status { .. } | PriceError::Read(_)
        )
    }

    /// True when the body arrived but does not describe a usable quotation,
    /// including a payload that lacks the requested currency.
    pub fn is_parse(&self) -> bool {
        matches!(self, PriceError::Parse(_) | PriceError::MissingCurrency(_))
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;
