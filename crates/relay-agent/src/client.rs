use crate::backends::openrouter::OpenRouterBackend;
use crate::backends::{ChatBackend, ChatRequest};
use crate::classify::classify_failure;
use crate::config::{validate_model, ClientConfig, API_KEY_PREFIX};
use crate::retry::RetryPolicy;
use relay_core::{AgentRequest, RelayError, RelayResult};
use relay_security::{has_key_prefix, RateLimiter};
use tracing::{debug, info, warn};

/// Chat client wrapping a transport with rate limiting, retry and error classification.
///
/// Each attempt is gated by the client's own [`RateLimiter`]; transport failures are
/// classified and retried per the [`RetryPolicy`]. `send_message` takes `&mut self`,
/// so at most one call per client is in flight and the limiter needs no lock.
pub struct ApiClient {
    api_key: String,
    model: String,
    retry: RetryPolicy,
    limiter: RateLimiter,
    backend: Box<dyn ChatBackend>,
}

impl ApiClient {
    /// Build a client talking to OpenRouter.
    ///
    /// Fails with a config error if the configured default model is unsupported.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> RelayResult<Self> {
        let api_key = api_key.into();
        let backend = OpenRouterBackend::new(api_key.clone(), &config)?;
        Self::from_backend(api_key, config, Box::new(backend))
    }

    /// Create from a pre-built backend (for custom transports and tests).
    pub fn from_backend(
        api_key: impl Into<String>,
        config: ClientConfig,
        backend: Box<dyn ChatBackend>,
    ) -> RelayResult<Self> {
        validate_model(&config.model)?;
        Ok(Self {
            api_key: api_key.into(),
            limiter: RateLimiter::from_config(&config.rate_limit),
            model: config.model,
            retry: config.retry,
            backend,
        })
    }

    /// Default model used when a request carries no override.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The client's rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Local syntactic key check: non-blank and carrying the OpenRouter prefix.
    ///
    /// Does not contact the remote service.
    pub fn validate_api_key(&self) -> bool {
        has_key_prefix(&self.api_key, API_KEY_PREFIX)
    }

    /// Send `message`, optionally under a persona system prompt and model override,
    /// and return the text of the first completion.
    pub async fn send_message(
        &mut self,
        message: &str,
        model: Option<&str>,
        system_prompt: Option<&str>,
    ) -> RelayResult<String> {
        let mut request = AgentRequest::new(message);
        request.model = model.map(str::to_string);
        request.system_prompt = system_prompt.map(str::to_string);
        self.send(&request).await
    }

    /// Send a prepared [`AgentRequest`].
    pub async fn send(&mut self, request: &AgentRequest) -> RelayResult<String> {
        if request.message.trim().is_empty() {
            return Err(RelayError::Config("Message must not be empty".to_string()));
        }

        let model = match request.model.as_deref() {
            Some(m) => {
                validate_model(m)?;
                m
            }
            None => self.model.as_str(),
        };

        let chat = ChatRequest {
            model: model.to_string(),
            messages: request.to_messages(),
        };

        info!(request_id = %request.id, model = %chat.model, "Sending message");

        let limiter = &mut self.limiter;
        let backend = &*self.backend;
        let chat_ref = &chat;
        let completion = self
            .retry
            .run(move || {
                let admitted = limiter.admit();
                async move {
                    admitted?;
                    backend
                        .complete(chat_ref)
                        .await
                        .map_err(|failure| {
                            let err = classify_failure(&failure);
                            warn!(kind = %failure.kind, error = %err, "Request attempt failed");
                            err
                        })
                }
            })
            .await?;

        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(RelayError::Unclassified(
                "no valid choices in response".to_string(),
            ));
        };

        debug!(request_id = %request.id, "Received completion");
        Ok(choice.message.content.unwrap_or_default())
    }
}
