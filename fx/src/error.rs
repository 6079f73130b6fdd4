//! FX engine error types.

use coinconv_common::{CurrencyPair, UnknownSourceError};
use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// Every direct and intermediary combination was tried without a rate.
    #[error("No exchange services and conversion rates found for {0}")]
    ConversionNotFound(CurrencyPair),

    /// The requested source is unknown or not registered.
    #[error("Unsupported exchange source: {0}")]
    UnsupportedSource(String),

    /// The request failed boundary validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The cache store could not be read or written.
    #[error("Rate store error: {0}")]
    Store(String),
}

impl FxError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::ConversionNotFound(_) => "CONVERSION_NOT_FOUND",
            FxError::UnsupportedSource(_) => "UNSUPPORTED_SOURCE",
            FxError::InvalidRequest(_) => "INVALID_REQUEST",
            FxError::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether the failure was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FxError::Store(_))
    }
}

impl From<UnknownSourceError> for FxError {
    fn from(err: UnknownSourceError) -> Self {
        FxError::UnsupportedSource(err.0)
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
