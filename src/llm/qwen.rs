//! Qwen (DashScope) summarization client.
//!
//! Talks to the DashScope OpenAI-compatible chat-completions endpoint.

use super::{Summarizer, build_prompt, strip_code_fences};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Qwen summarization client.
pub struct QwenClient {
    /// API key.
    api_key: Option<String>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl QwenClient {
    /// Default API endpoint (DashScope OpenAI-compatible mode).
    pub const DEFAULT_ENDPOINT: &'static str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "qwen-plus";

    /// Default request timeout.
    const TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a new Qwen client.
    ///
    /// Reads the API key from `DASHSCOPE_API_KEY` when present.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("DASHSCOPE_API_KEY").ok();
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Makes a chat-completion request.
    fn request(&self, prompt: String) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::OperationFailed {
                operation: "qwen_request".to_string(),
                cause: "DASHSCOPE_API_KEY not set".to_string(),
            })?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: 1024,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .timeout(Self::TIMEOUT)
            .json(&request)
            .send()
            .map_err(|e| Error::OperationFailed {
                operation: "qwen_request".to_string(),
                cause: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::OperationFailed {
                operation: "qwen_request".to_string(),
                cause: format!("HTTP {}", response.status()),
            });
        }

        let completion: ChatCompletionResponse =
            response.json().map_err(|e| Error::OperationFailed {
                operation: "qwen_response_parse".to_string(),
                cause: e.to_string(),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::OperationFailed {
                operation: "qwen_response_parse".to_string(),
                cause: "no choices in response".to_string(),
            })
    }
}

impl Default for QwenClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer for QwenClient {
    fn name(&self) -> &'static str {
        "qwen"
    }

    fn summarize(
        &self,
        company_name: &str,
        tech_text: &str,
        scope_text: &str,
        intro_text: &str,
    ) -> Result<String> {
        let prompt = build_prompt(company_name, tech_text, scope_text, intro_text);
        let raw = self.request(prompt)?;
        Ok(strip_code_fences(&raw))
    }
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// One chat message.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Assistant message in a completion choice.
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
