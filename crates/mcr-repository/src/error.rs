use std::fmt;

use mcr_client::ClientError;
use mcr_protocol::ProtocolError;
use mcr_types::TypeError;
use thiserror::Error;

/// Errors from converting entities to and from their ledger encoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("entity data is not UTF-8: {0}")]
    Utf8(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Broad class of a repository failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad argument or configuration; detected before any network call.
    Input,
    /// The node could not be reached or answered with a non-2xx status.
    Transport,
    /// The node answered with a JSON-RPC error object.
    Remote,
    /// Duplicate key on save, several records for one key, missing key.
    Integrity,
    /// Malformed JSON, hex, or error object.
    Decoding,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input",
            Self::Transport => "transport",
            Self::Remote => "remote",
            Self::Integrity => "integrity",
            Self::Decoding => "decoding",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TypeError),

    #[error("no key available for entity in stream {stream}")]
    MissingKey { stream: String },

    #[error("key {key} already exists in stream {stream}")]
    DuplicateKey { stream: String, key: String },

    #[error("incorrect result size: expected {expected}, got {actual}")]
    IncorrectResultSize { expected: usize, actual: usize },

    #[error("record {key} in stream {stream} has no data")]
    EmptyRecord { stream: String, key: String },

    #[error("retrieval failed: code={code}, message={message}")]
    Retrieval { code: i64, message: String },

    #[error("write failed: code={code}, message={message}")]
    Write { code: i64, message: String },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Input,
            Self::MissingKey { .. }
            | Self::DuplicateKey { .. }
            | Self::IncorrectResultSize { .. }
            | Self::EmptyRecord { .. } => ErrorKind::Integrity,
            Self::Retrieval { .. } | Self::Write { .. } => ErrorKind::Remote,
            Self::Codec(_) => ErrorKind::Decoding,
            Self::Protocol(e) => protocol_kind(e),
            Self::Client(e) => match e {
                ClientError::InvalidConfig(_) | ClientError::Config(_) => ErrorKind::Input,
                ClientError::Http(_) | ClientError::Status { .. } | ClientError::Io(_) => {
                    ErrorKind::Transport
                }
                ClientError::Protocol(p) => protocol_kind(p),
            },
        }
    }

    /// Code and message reported by the node, for read or write failures.
    pub fn remote_error(&self) -> Option<(i64, &str)> {
        match self {
            Self::Retrieval { code, message } | Self::Write { code, message } => {
                Some((*code, message.as_str()))
            }
            _ => None,
        }
    }
}

fn protocol_kind(err: &ProtocolError) -> ErrorKind {
    match err {
        ProtocolError::InvalidParams(_) | ProtocolError::UnknownMethod(_) => ErrorKind::Input,
        ProtocolError::Serialization(_)
        | ProtocolError::Deserialization(_)
        | ProtocolError::MalformedError(_) => ErrorKind::Decoding,
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
