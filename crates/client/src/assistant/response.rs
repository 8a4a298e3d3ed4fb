//! Chat completion response types and normalization.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::AssistantError;
use super::request::ChatMessage;

/// Raw chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Normalized assistant reply for internal use.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub elapsed_ms: u64,
}

impl TryFrom<ChatCompletionResponse> for AssistantReply {
    type Error = AssistantError;

    /// Take the first choice; an absent or blank reply is a parse error.
    fn try_from(raw: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let choice = raw
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Parse("response contained no choices".to_string()))?;

        let text = choice.message.content.unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(AssistantError::Parse("assistant returned an empty reply".to_string()));
        }

        Ok(Self { text, finish_reason: choice.finish_reason, usage: raw.usage, request_id: raw.id, elapsed_ms: 0 })
    }
}

impl AssistantReply {
    /// Set the elapsed time from request start.
    pub fn with_timing(mut self, start: Instant) -> Self {
        self.elapsed_ms = start.elapsed().as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  ## Campus News\n- Fest on Friday  "}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        }"#;
        let raw: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let reply = AssistantReply::try_from(raw).unwrap();
        assert_eq!(reply.text, "## Campus News\n- Fest on Friday");
        assert_eq!(reply.finish_reason.as_deref(), Some("stop"));
        assert_eq!(reply.usage.unwrap().total_tokens, 30);
        assert_eq!(reply.request_id.as_deref(), Some("chatcmpl-1"));
    }

    #[test]
    fn test_no_choices() {
        let raw: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(AssistantReply::try_from(raw), Err(AssistantError::Parse(_))));
    }

    #[test]
    fn test_blank_content() {
        let raw: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#).unwrap();
        assert!(matches!(AssistantReply::try_from(raw), Err(AssistantError::Parse(_))));
    }
}
