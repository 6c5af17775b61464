use super::{ChatBackend, ChatCompletion, ChatRequest, TransportFailure};
use crate::config::ClientConfig;
use async_trait::async_trait;
use relay_core::{RelayError, RelayResult};
use std::time::Duration;
use tracing::debug;

/// OpenRouter chat-completions transport.
///
/// Speaks the OpenAI-compatible `POST /chat/completions` API, so any endpoint
/// implementing it can be targeted through `base_url`.
pub struct OpenRouterBackend {
    url: String,
    api_key: String,
    http: reqwest::Client,
}

impl OpenRouterBackend {
    /// Build a backend with the configured base URL and request timeout.
    pub fn new(api_key: impl Into<String>, config: &ClientConfig) -> RelayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            http,
        })
    }

    /// Full chat-completions endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            // OpenRouter attribution headers
            .header("HTTP-Referer", "https://github.com/relay-cli/relay")
            .header("X-Title", "relay")
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn request_failure(err: reqwest::Error) -> TransportFailure {
    // The URL may carry digits (ports) that would confuse status-code matching.
    let err = err.without_url();
    let text = error_chain(&err);
    if err.is_timeout() {
        TransportFailure::new("TimeoutError", format!("request timeout: {text}"))
    } else if err.is_connect() {
        TransportFailure::new("ConnectionError", text)
    } else if err.is_decode() {
        TransportFailure::new("DecodeError", text)
    } else {
        TransportFailure::new("RequestError", text)
    }
}

#[async_trait]
impl ChatBackend for OpenRouterBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, TransportFailure> {
        debug!(url = %self.url, model = %request.model, "Sending chat completion");

        let resp = self
            .add_provider_headers(self.http.post(&self.url))
            .json(request)
            .send()
            .await
            .map_err(request_failure)?;

        let status = resp.status();
        let body = resp.text().await.map_err(request_failure)?;

        if !status.is_success() {
            return Err(TransportFailure::new(
                "StatusError",
                format!("HTTP {status}: {body}"),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            TransportFailure::new("DecodeError", format!("invalid response body: {e}"))
        })
    }
}
