// OpenRouter chat-completions provider (OpenAI-compatible wire format).

use std::error::Error as _;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ChatRequest, Completion, LlmProvider, TokenUsage, UpstreamFailure};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Install the process-wide rustls crypto provider. Safe to call repeatedly.
pub fn install_crypto_provider() {
    // Err means another provider is already installed.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

#[derive(Debug)]
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: String) -> Result<Self, UpstreamFailure> {
        install_crypto_provider();
        // No client-side timeout: the transport default is inherited.
        let client = Client::builder()
            .build()
            .map_err(|e| UpstreamFailure(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: OPENROUTER_BASE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

fn transport_failure(e: &reqwest::Error) -> UpstreamFailure {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    if e.is_timeout() {
        UpstreamFailure(format!("Request timeout: {text}"))
    } else {
        UpstreamFailure(text)
    }
}

/// Decode a 2xx body into a completion, surfacing in-body error payloads.
fn parse_body(body: &str) -> Result<Completion, UpstreamFailure> {
    // serde messages can contain "invalid", which classifies as authentication.
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "Undecodable chat-completions body");
        UpstreamFailure("Malformed response body from upstream".to_string())
    })?;

    if let Some(err) = parsed.error {
        return Err(UpstreamFailure(err.message));
    }

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();
    let usage = parsed.usage.map_or_else(TokenUsage::default, |u| {
        TokenUsage::new(u.prompt_tokens, u.completion_tokens)
    });

    Ok(Completion { text, usage })
}

#[async_trait::async_trait]
#[allow(clippy::unnecessary_literal_bound)]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<Completion, UpstreamFailure> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, max_tokens = request.max_tokens, "Calling OpenRouter API");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .header("X-Title", "critique")
            .json(request)
            .send()
            .await
            .map_err(|e| transport_failure(&e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| transport_failure(&e))?;

        if !status.is_success() {
            return Err(UpstreamFailure(format!(
                "Error code: {} - {body}",
                status.as_u16()
            )));
        }

        parse_body(&body)
    }
}
