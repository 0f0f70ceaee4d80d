use thiserror::Error;

/// Errors raised while interpreting backend payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected payload: {0}")]
    UnexpectedShape(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
