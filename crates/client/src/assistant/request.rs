//! Chat completion request types and validation.

use serde::{Deserialize, Serialize};

use super::AssistantError;

/// Longest single message we are willing to send.
const MAX_MESSAGE_CHARS: usize = 32_000;

/// Chat completion request (OpenAI-compatible wire format).
#[derive(Debug, Clone, Serialize, Default)]
pub struct ChatRequest {
    pub model: String,

    pub messages: Vec<ChatMessage>,

    /// Sampling temperature (0.0 - 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: Some(content.into()) }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: Some(content.into()) }
    }
}

impl ChatRequest {
    /// System prompt followed by one user turn.
    pub fn single_turn(model: impl Into<String>, system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            ..Default::default()
        }
    }

    /// Validate the request before it goes on the wire.
    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.model.is_empty() {
            return Err(AssistantError::InvalidRequest("model cannot be empty".to_string()));
        }

        if !self.messages.iter().any(|m| m.role == Role::User) {
            return Err(AssistantError::InvalidRequest("at least one user message is required".to_string()));
        }

        for message in &self.messages {
            let content = message.content.as_deref().unwrap_or("");
            if content.trim().is_empty() {
                return Err(AssistantError::InvalidRequest("message content cannot be empty".to_string()));
            }
            let chars = content.chars().count();
            if chars > MAX_MESSAGE_CHARS {
                return Err(AssistantError::InvalidRequest(format!(
                    "message too long: {chars} chars (max {MAX_MESSAGE_CHARS})"
                )));
            }
        }

        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(AssistantError::InvalidRequest("temperature must be between 0.0 and 2.0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_turn_shape() {
        let req = ChatRequest::single_turn("gemini-2.0-flash", "be brief", "campus news?");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gemini-2.0-flash");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "campus news?");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_validate_ok() {
        let req = ChatRequest::single_turn("m", "s", "p");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_prompt() {
        let req = ChatRequest::single_turn("m", "s", "   ");
        assert!(matches!(req.validate(), Err(AssistantError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_requires_user_turn() {
        let req = ChatRequest { model: "m".into(), messages: vec![ChatMessage::system("s")], ..Default::default() };
        assert!(matches!(req.validate(), Err(AssistantError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_too_long() {
        let req = ChatRequest::single_turn("m", "s", "x".repeat(MAX_MESSAGE_CHARS + 1));
        assert!(matches!(req.validate(), Err(AssistantError::InvalidRequest(msg)) if msg.contains("too long")));
    }

    #[test]
    fn test_validate_temperature() {
        let req = ChatRequest { temperature: Some(2.5), ..ChatRequest::single_turn("m", "s", "p") };
        assert!(matches!(req.validate(), Err(AssistantError::InvalidRequest(_))));
    }
}
