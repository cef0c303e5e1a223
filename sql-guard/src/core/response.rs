//! The model response handed to a validator.

use serde::{Deserialize, Serialize};

/// Status reported by the model client for a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptResponseStatus {
    #[default]
    Success,
    Error,
    RateLimited,
    InvalidResponse,
    TooLong,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role tag, e.g. `assistant`
    pub role: String,
    /// Text content; models may return none
    #[serde(default)]
    pub content: Option<String>,
}

impl Message {
    /// Creates an assistant message with the given content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
        }
    }
}

/// The candidate response produced for the current attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PromptResponse {
    pub status: PromptResponseStatus,
    #[serde(default)]
    pub message: Option<Message>,
}

impl PromptResponse {
    /// Creates a successful response carrying an assistant message.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            status: PromptResponseStatus::Success,
            message: Some(Message::assistant(content)),
        }
    }

    /// Returns the message text, or an empty string when there is none.
    pub fn content(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_defaults_to_empty() {
        assert_eq!(PromptResponse::default().content(), "");

        let response = PromptResponse {
            status: PromptResponseStatus::Success,
            message: Some(Message {
                role: "assistant".to_string(),
                content: None,
            }),
        };
        assert_eq!(response.content(), "");
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let response: PromptResponse = serde_json::from_value(json!({
            "status": "success",
            "message": {"role": "assistant", "content": "SELECT 1"}
        }))
        .unwrap();
        assert_eq!(response, PromptResponse::success("SELECT 1"));

        let response: PromptResponse =
            serde_json::from_value(json!({"status": "rate_limited"})).unwrap();
        assert_eq!(response.status, PromptResponseStatus::RateLimited);
        assert!(response.message.is_none());
    }
}
