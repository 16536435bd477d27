/*!
 * Client for OpenAI-compatible chat-completion APIs.
 *
 * DeepSeek exposes the same wire format as OpenAI, so one client covers
 * both: POST `{endpoint}/chat/completions` with a JSON body
 * `{model, messages, temperature, stream: false}` and a bearer token.
 * Failed requests are retried with linearly growing sleeps; client errors
 * other than 429 are not retried because resending the same request cannot
 * succeed.
 */

use std::time::Duration;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

/// Request structure for chat completions
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. "deepseek-chat"
    pub model: String,
    /// Conversation messages in order
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Always false; streaming is not used
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>) -> Self {
        ChatRequest {
            model: model.into(),
            messages: Vec::new(),
            temperature: 0.5,
            stream: false,
        }
    }

    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Response structure from the chat completions endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Token usage reported by the API
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl ChatResponse {
    /// The translated text: `choices[0].message.content`
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Client for DeepSeek and other OpenAI-compatible endpoints
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DeepSeekClient {
    /// Create a new client with default retry behavior
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_retries(api_key, endpoint, 30, 3, 1000)
    }

    /// Create a new client with explicit timeout and retry settings
    pub fn with_retries(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        DeepSeekClient {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Send a chat completion request, retrying transient failures
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=self.max_retries.max(1) {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<ChatResponse>()
                            .await
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<no response body>".to_string());
                    if status.as_u16() == 401 || status.as_u16() == 403 {
                        return Err(ProviderError::AuthenticationError(message));
                    }
                    if status.is_client_error() && status.as_u16() != 429 {
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                    warn!(
                        "chat completion attempt {}/{} failed with status {}",
                        attempt, self.max_retries, status
                    );
                    last_error = Some(if status.as_u16() == 429 {
                        ProviderError::RateLimitExceeded(message)
                    } else {
                        ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        }
                    });
                }
                Err(e) => {
                    warn!(
                        "chat completion attempt {}/{} failed: {}",
                        attempt, self.max_retries, e
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            if attempt < self.max_retries {
                // linear backoff: base, 2*base, 3*base, ...
                let backoff = Duration::from_millis(self.backoff_base_ms * attempt as u64);
                tokio::time::sleep(backoff).await;
            }
        }

        let error = last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries
            ))
        });
        error!("chat completion gave up: {}", error);
        Err(error)
    }

    /// Cheap connectivity probe used at startup
    pub async fn test_connection(&self, model: &str) -> Result<(), ProviderError> {
        let request = ChatRequest::new(model)
            .add_message("user", "ping")
            .temperature(0.0);
        self.complete(request).await.map(|_| ())
    }
}
