use crate::retry::RetryPolicy;
use relay_core::{RelayError, RelayResult};
use relay_security::{RateLimitConfig, DEFAULT_MAX_INPUT_LENGTH};
use serde::{Deserialize, Serialize};

/// Models the client accepts. Anything else is rejected before any network activity.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "claude-3-haiku",
    "claude-3-sonnet",
    "claude-3-opus",
    "llama-3.1-8b-instruct",
    "llama-3.1-70b-instruct",
];

/// Prefix every OpenRouter API key starts with.
pub const API_KEY_PREFIX: &str = "sk-or-";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_input_length() -> usize {
    DEFAULT_MAX_INPUT_LENGTH
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry: RetryPolicy::default(),
            rate_limit: RateLimitConfig::default(),
            max_input_length: default_max_input_length(),
        }
    }
}

pub fn is_supported_model(model: &str) -> bool {
    SUPPORTED_MODELS.contains(&model)
}

/// Fails with a config error naming the supported models when `model` is not one of them.
pub fn validate_model(model: &str) -> RelayResult<()> {
    if is_supported_model(model) {
        return Ok(());
    }
    let mut available = SUPPORTED_MODELS.to_vec();
    available.sort_unstable();
    Err(RelayError::Config(format!(
        "Model '{model}' is not supported. Available models: {}",
        available.join(", ")
    )))
}
