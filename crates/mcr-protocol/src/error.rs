use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid request parameters: {0}")]
    InvalidParams(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("malformed error object: {0}")]
    MalformedError(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
