pub mod classify;
pub mod client;
pub mod openrouter;
pub mod prompt;

use serde::{Deserialize, Serialize};

pub use client::{Analysis, AnalysisRequest, ClientState, InferenceClient};
pub use openrouter::OpenRouterProvider;

/// Token usage reported for an LLM call.
///
/// Serialized as `{"input": .., "output": ..}`, the shape used by both the
/// settings ledger and history entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
}

impl TokenUsage {
    pub fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }

    /// Saturating component-wise sum.
    #[must_use]
    pub fn plus(self, other: TokenUsage) -> Self {
        Self {
            input: self.input.saturating_add(other.input),
            output: self.output.saturating_add(other.output),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Body of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// What a provider returns on a successful round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// First choice's content; empty when the upstream sent none.
    pub text: String,
    pub usage: TokenUsage,
}

/// Unclassified failure text from a provider.
///
/// The [`InferenceClient`] turns this into an [`LlmError`](crate::error::LlmError)
/// using the rules in [`classify`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct UpstreamFailure(pub String);

/// Common interface for chat-completion backends.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Perform exactly one round trip. No retries.
    async fn complete(&self, request: &ChatRequest) -> Result<Completion, UpstreamFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_usage_serde_shape() {
        let usage = TokenUsage::new(12, 34);
        let json = serde_json::to_value(usage).unwrap();
        assert_eq!(json, serde_json::json!({"input": 12, "output": 34}));

        let partial: TokenUsage = serde_json::from_str(r#"{"input": 5}"#).unwrap();
        assert_eq!(partial, TokenUsage::new(5, 0));
    }

    #[test]
    fn token_usage_plus() {
        let sum = TokenUsage::new(1, 2).plus(TokenUsage::new(10, 20));
        assert_eq!(sum, TokenUsage::new(11, 22));
        let sat = TokenUsage::new(u64::MAX, 0).plus(TokenUsage::new(1, 0));
        assert_eq!(sat.input, u64::MAX);
    }

    #[test]
    fn chat_request_wire_format() {
        let req = ChatRequest {
            model: "openai/gpt-4o-mini".into(),
            messages: vec![ChatMessage {
                role: Role::System,
                content: "sys".into(),
            }],
            temperature: 0.3,
            max_tokens: 4000,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 4000);
    }
}
