//! Unified error types for camply.
//!
//! Every variant carries a stable code prefix that also drives the MCP error
//! code mapping at the tool boundary.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the camply crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty owner id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Key-value backend failure that is not a database error.
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),

    /// Write rejected because the store would exceed its byte quota.
    #[error("STORAGE_QUOTA_EXCEEDED: need {needed} bytes, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    /// A stored record could not be encoded or decoded.
    #[error("SERIALIZATION_ERROR: {0}")]
    Serialization(String),

    /// No assistant credentials were configured.
    #[error("ASSISTANT_DISABLED: set CAMPLY_ASSISTANT_API_KEY to enable campus content")]
    AssistantDisabled,

    /// Assistant rejected our credentials.
    #[error("ASSISTANT_AUTH_ERROR: {0}")]
    AssistantAuth(String),

    /// Assistant rate limited the request.
    #[error("ASSISTANT_RATE_LIMITED: {0}")]
    AssistantRateLimited(String),

    /// Assistant request timed out.
    #[error("ASSISTANT_TIMEOUT: {0}")]
    AssistantTimeout(String),

    /// Any other assistant failure (network, HTTP status, malformed reply).
    #[error("ASSISTANT_FAILED: {0}")]
    AssistantFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Storage(msg) => (-32002, msg.clone()),
            Error::QuotaExceeded { .. } => (-32003, err.to_string()),
            Error::Serialization(msg) => (-32004, msg.clone()),
            Error::AssistantDisabled => (-32010, "Assistant is not configured".to_string()),
            Error::AssistantAuth(msg) => (-32011, msg.clone()),
            Error::AssistantRateLimited(msg) => (-32012, msg.clone()),
            Error::AssistantTimeout(msg) => (-32013, msg.clone()),
            Error::AssistantFailed(msg) => (-32014, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Storage("kv_store unavailable".to_string());
        assert_eq!(err.to_string(), "STORAGE_ERROR: kv_store unavailable");
    }

    #[test]
    fn test_quota_display() {
        let err = Error::QuotaExceeded { needed: 2048, quota: 1024 };
        let msg = err.to_string();
        assert!(msg.starts_with("STORAGE_QUOTA_EXCEEDED"));
        assert!(msg.contains("2048"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let mcp_err: McpError = Error::InvalidInput("owner_id cannot be empty".to_string()).into();
        assert_eq!(mcp_err.code.0, -32602);

        let mcp_err: McpError = Error::AssistantDisabled.into();
        assert_eq!(mcp_err.code.0, -32010);
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
