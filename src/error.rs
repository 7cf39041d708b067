//! Library error types

use thiserror::Error;

use crate::core::envelope::CacheEntry;

/// Failures of the offline cross-rate conversion.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("Quotes must be a list of quote records")]
    InvalidQuotes,

    #[error("No quote found for currency: {0}")]
    MissingFrom(String),

    #[error("No quote found for currency: {0}")]
    MissingTo(String),

    #[error("Base currency mismatch: {from_base} for {from}, {to_base} for {to}")]
    BaseMismatch {
        from: String,
        from_base: String,
        to: String,
        to_base: String,
    },

    #[error("Quote for {0} is zero, rate is undefined")]
    ZeroQuote(String),
}

#[derive(Debug, Error)]
pub enum Error {
    /// The client cannot be built from the given settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A call was rejected before anything was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The response did not carry the expected field.
    #[error("Response is missing field: {field}")]
    Remote {
        field: String,
        response: Box<CacheEntry>,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
