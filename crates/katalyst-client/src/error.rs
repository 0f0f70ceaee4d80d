use katalyst_protocol::ProtocolError;
use thiserror::Error;

/// Everything a request can fail with. The `Display` text is what pages
/// show in their error banner.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    /// `success: false` envelope; carries the backend's own message.
    #[error("{0}")]
    Backend(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<ProtocolError> for ClientError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::Decode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_text() {
        let err = ClientError::Status {
            status: 404,
            message: "Repository not found".into(),
        };
        assert_eq!(err.to_string(), "server returned 404: Repository not found");
        assert_eq!(ClientError::Backend("quota exceeded".into()).to_string(), "quota exceeded");
    }

    #[test]
    fn test_protocol_invalid_input_stays_local() {
        let err: ClientError = ProtocolError::InvalidInput("Title is required".into()).into();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }
}
