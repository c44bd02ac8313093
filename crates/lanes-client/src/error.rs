use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status. `message` comes from the response body when the
    /// server sent one.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("push channel closed")]
    Closed,
}

impl ClientError {
    /// Text suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}
