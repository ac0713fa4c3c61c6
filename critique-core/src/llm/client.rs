//! The inference client: one analysis, one upstream round trip.
//!
//! The client does not persist anything and does not account tokens; the
//! caller records a successful [`Analysis`] through the
//! [`Session`](crate::session::Session).

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::mode::ReviewMode;
use crate::models::DEFAULT_MODEL;
use crate::validate::validate_api_key;

use super::classify::classify;
use super::openrouter::OpenRouterProvider;
use super::prompt::build_request;
use super::{LlmProvider, TokenUsage};

pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

const EMPTY_RESPONSE: &str = "Received empty response from API";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    InFlight,
}

/// Everything needed for one analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: String,
    pub mode: ReviewMode,
    pub context: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>, mode: ReviewMode) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            mode,
            context: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A successful analysis: non-empty markdown plus reported usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub text: String,
    pub usage: TokenUsage,
}

#[derive(Debug)]
pub struct InferenceClient {
    provider: Box<dyn LlmProvider>,
    state: Mutex<ClientState>,
}

/// Resets the client to `Idle` however the call ends.
struct InFlight<'a>(&'a Mutex<ClientState>);

impl<'a> InFlight<'a> {
    fn enter(state: &'a Mutex<ClientState>) -> Self {
        *state.lock().unwrap_or_else(PoisonError::into_inner) = ClientState::InFlight;
        Self(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = ClientState::Idle;
    }
}

impl InferenceClient {
    /// Client for an OpenRouter-compatible endpoint at `base_url`.
    ///
    /// The key is format-checked first, so a malformed key never reaches the
    /// network.
    pub fn openrouter(api_key: &str, base_url: &str) -> crate::error::Result<Self> {
        let key = validate_api_key(api_key)?;
        let provider = OpenRouterProvider::new(key.to_string())
            .map_err(|e| LlmError::Api { detail: e.0 })?
            .with_base_url(base_url.to_string());
        Ok(Self::with_provider(Box::new(provider)))
    }

    pub fn with_provider(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(ClientState::Idle),
        }
    }

    pub fn state(&self) -> ClientState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send one analysis request and classify any failure.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, LlmError> {
        let chat = build_request(
            request.mode,
            &request.code,
            &request.language,
            request.context.as_deref(),
            &request.model,
            request.max_tokens,
            request.temperature,
        );

        info!(
            provider = self.provider.name(),
            model = %request.model,
            mode = request.mode.key(),
            chars = request.code.len(),
            "Sending analysis request"
        );

        let _guard = InFlight::enter(&self.state);
        let outcome = match self.provider.complete(&chat).await {
            Ok(c) if c.text.is_empty() => Err(classify(EMPTY_RESPONSE)),
            Ok(c) => Ok(Analysis {
                text: c.text,
                usage: c.usage,
            }),
            Err(failure) => Err(classify(failure.0)),
        };

        match &outcome {
            Ok(a) => debug!(input = a.usage.input, output = a.usage.output, "Analysis succeeded"),
            Err(e) => warn!(detail = e.detail(), "Analysis failed: {e}"),
        }
        outcome
    }
}
