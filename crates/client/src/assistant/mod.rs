//! Chat assistant client.
//!
//! Talks to an OpenAI-compatible chat completions endpoint (Gemini's
//! compatibility layer by default).
//!
//! - **Endpoint**: `POST {base_url}/chat/completions`
//! - **Authentication**: `Authorization: Bearer <key>`
//! - **Rate limiting**: minimum interval between requests, enforced client side
//! - **Status mapping**: 401/403 auth, 429 rate limited, other 4xx/5xx HTTP error

pub mod error;
pub mod request;
pub mod response;

pub use error::AssistantError;
pub use request::{ChatMessage, ChatRequest, Role};
pub use response::{AssistantReply, Usage};

use async_trait::async_trait;
use camply_core::AppConfig;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::campus::ContentGenerator;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "camply/0.1";

/// Minimum interval between requests.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Persona sent as the system turn of every request.
pub const SYSTEM_PROMPT: &str = "You are Camply, a campus assistant for college students. \
Answer with concise, well-structured Markdown. Prefer concrete facts about the named institution; \
say so plainly when information may be outdated or unavailable.";

/// Assistant client configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: String,
    /// Base URL without trailing `/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self {
            api_key: String::new(),
            base_url: app.assistant_base_url,
            model: app.assistant_model,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AssistantConfig {
    /// Build from the loaded application config.
    ///
    /// Returns `MissingApiKey` when no key is configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AssistantError> {
        let api_key = config
            .require_assistant_api_key()
            .map_err(|_| AssistantError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.assistant_base_url.clone(),
            model: config.assistant_model.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Chat assistant client.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    config: AssistantConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl AssistantClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        if config.api_key.is_empty() {
            return Err(AssistantError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Network(Arc::new(e)))?;

        Ok(Self { http, config, rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)) })
    }

    /// Create a client from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AssistantError> {
        Self::new(AssistantConfig::from_app_config(config)?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a chat completion request and normalize the reply.
    pub async fn chat(&self, req: ChatRequest) -> Result<AssistantReply, AssistantError> {
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = self.config.completions_url();

        tracing::debug!(model = %req.model, messages = req.messages.len(), "calling assistant");

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(&req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("assistant response status: {}", status);

        if status == 401 || status == 403 {
            return Err(AssistantError::AuthError);
        }

        if status == 429 {
            return Err(AssistantError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(AssistantError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let raw: response::ChatCompletionResponse =
            serde_json::from_slice(&bytes).map_err(|e| AssistantError::Parse(e.to_string()))?;

        let reply = AssistantReply::try_from(raw)?.with_timing(start);
        tracing::debug!(elapsed_ms = reply.elapsed_ms, chars = reply.text.len(), "assistant replied");

        Ok(reply)
    }
}

#[async_trait]
impl ContentGenerator for AssistantClient {
    async fn generate(&self, prompt: &str) -> Result<String, camply_core::Error> {
        let req = ChatRequest::single_turn(self.config.model.clone(), SYSTEM_PROMPT, prompt);
        let reply = self.chat(req).await?;
        Ok(reply.text)
    }
}
