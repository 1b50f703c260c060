use thiserror::Error;

/// Errors produced by type construction and conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("stream name must not be blank")]
    BlankStreamName,

    #[error("record key must not be blank")]
    BlankKey,

    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}
