//! Chat completion provider.
//!
//! Provides the [`CompletionProvider`] trait and [`GroqClient`], which talks
//! to an OpenAI-compatible `chat/completions` endpoint. The provider is the
//! only network dependency of the chatbot; tests swap in scripted
//! implementations of the trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion endpoint returned status {status}: {body}")]
    BadStatus { status: u16, body: String },
    #[error("completion response contained no choices")]
    EmptyChoices,
}

/// Trait for turning a list of role-tagged messages into generated text.
///
/// Deliberately opaque: no timeout, retry, or cancellation logic lives here
/// or around callers — a slow remote call simply holds its request.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion and return the first choice's text content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Groq-hosted completion client (OpenAI-compatible API).
pub struct GroqClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &crate::config::CompletionConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        let choice = parsed.choices.into_iter().next().ok_or(CompletionError::EmptyChoices)?;
        Ok(choice.message.content)
    }
}
