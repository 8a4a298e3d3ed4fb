//! MCP tool implementations.
//!
//! This module contains all tools exposed by the camply server.

pub mod cache;
pub mod campus_content;

use camply_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::Serialization(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Reject blank required string parameters.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> String {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_result_wraps_text() {
        let result = json_result(&serde_json::json!({"deleted": 3})).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(value["deleted"], 3);
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("owner_id", "userA").is_ok());
        let err = require_non_empty("owner_id", "  ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg == "owner_id cannot be empty"));
    }
}
