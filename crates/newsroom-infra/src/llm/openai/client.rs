//! OpenAiTextProvider -- concrete [`TextProvider`] implementation for the
//! OpenAI chat completions API.
//!
//! Sends requests to `/chat/completions` with bearer authentication.
//! Free-form completion and JSON-constrained completion share one request
//! path; the structured variant adds `response_format: json_object` and an
//! optional system message.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use newsroom_core::collab::TextProvider;
use newsroom_types::error::CollaboratorError;

use super::map_status;
use super::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// OpenAI chat completions text provider.
///
/// Sampling behavior (model, temperature, token budget) is fixed at
/// construction; the pipeline holds separate instances where it needs
/// different settings.
pub struct OpenAiTextProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiTextProvider {
    /// Create a new provider for `model` with no sampling overrides.
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    /// The model this provider completes with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fix the sampling temperature for every request.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the completion length for every request.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a [`ChatRequest`] for the given prompt.
    fn chat_request(&self, system: Option<&str>, prompt: &str, structured: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_completion_tokens: self.max_tokens,
            response_format: structured.then(ResponseFormat::json_object),
        }
    }

    /// Send a chat request and return the first choice's content.
    async fn chat(&self, body: ChatRequest) -> Result<String, CollaboratorError> {
        let url = self.url("/chat/completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::UnexpectedShape(format!("chat response: {e}")))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion finished"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CollaboratorError::UnexpectedShape("chat response had no content".to_string())
            })
    }
}

// OpenAiTextProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state. The SecretString field ensures
// the API key is never printed, but we also omit Debug entirely for
// defense-in-depth.

impl TextProvider for OpenAiTextProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let body = self.chat_request(None, prompt, false);
        self.chat(body).await
    }

    async fn complete_structured(
        &self,
        system: Option<&str>,
        prompt: &str,
    ) -> Result<Value, CollaboratorError> {
        let body = self.chat_request(system, prompt, true);
        let content = self.chat(body).await?;

        serde_json::from_str(&content).map_err(|e| {
            CollaboratorError::UnexpectedShape(format!("model emitted invalid JSON: {e}"))
        })
    }
}
