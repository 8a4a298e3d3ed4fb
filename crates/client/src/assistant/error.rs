//! Assistant client error types.

use std::sync::Arc;

/// Errors from the chat assistant client.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// No API key configured.
    #[error("missing API key: CAMPLY_ASSISTANT_API_KEY not set")]
    MissingApiKey,

    /// Request rejected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the assistant API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error or empty reply.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { AssistantError::Timeout } else { AssistantError::Network(Arc::new(err)) }
    }
}

impl From<AssistantError> for camply_core::Error {
    fn from(err: AssistantError) -> Self {
        use camply_core::Error;
        let message = err.to_string();
        match err {
            AssistantError::MissingApiKey => Error::AssistantDisabled,
            AssistantError::InvalidRequest(msg) => Error::InvalidInput(msg),
            AssistantError::AuthError => Error::AssistantAuth(message),
            AssistantError::RateLimited => Error::AssistantRateLimited(message),
            AssistantError::Timeout => Error::AssistantTimeout(message),
            AssistantError::HttpError { .. } | AssistantError::Network(_) | AssistantError::Parse(_) => {
                Error::AssistantFailed(message)
            }
        }
    }
}
