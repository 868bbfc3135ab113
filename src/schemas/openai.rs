//! OpenAI API schema definitions
//!
//! Request and response types for the subset of the Chat Completions API used
//! to generate SQL. Response types are lenient: unknown fields are ignored and
//! optional fields default, so OpenAI-compatible servers parse too.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// OpenAI Chat Completion Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model ID (e.g., "gpt-4.1-mini")
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
}

/// Role of a message we send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// Chat message with plain text content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Unique identifier for the completion
    #[serde(default)]
    pub id: String,

    /// Model used
    #[serde(default)]
    pub model: String,

    /// Completion choices
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// Completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: i32,

    /// The generated message
    pub message: AssistantMessage,

    /// Reason for stopping
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message in response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Role, "assistant" from OpenAI itself
    #[serde(default)]
    pub role: Option<String>,

    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: i32,

    #[serde(default)]
    pub completion_tokens: i32,

    #[serde(default)]
    pub total_tokens: i32,
}

// ============================================================================
// Error Types
// ============================================================================

/// OpenAI-style error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

/// OpenAI error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIError {
    /// Error message
    pub message: String,

    /// Error type
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Error code (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4.1-mini".to_string(),
            messages: vec![ChatMessage::system("be terse"), ChatMessage::user("hi")],
            temperature: Some(0.1),
            max_tokens: Some(500),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4.1-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 500);
    }

    #[test]
    fn test_response_parsing_ignores_unknown_fields() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4.1-mini",
            "system_fingerprint": null,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "SELECT 1;", "refusal": null},
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("SELECT 1;"));
        assert_eq!(response.choices[0].message.role.as_deref(), Some("assistant"));
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_error_parsing_with_null_code() {
        let json = r#"{"error": {"message": "Rate limit reached", "type": "requests", "param": null, "code": null}}"#;
        let error: OpenAIErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(error.error.message, "Rate limit reached");
        assert_eq!(error.error.error_type.as_deref(), Some("requests"));
        assert!(error.error.code.is_none());
    }
}
