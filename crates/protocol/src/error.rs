//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while reading or writing protocol lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error on protocol stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid fragment id: {0:?}")]
    InvalidId(String),

    #[error("Unexpected end of input")]
    UnexpectedEof,
}
