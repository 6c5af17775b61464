//! Resilient chat client for relay.
//!
//! [`ApiClient`] composes three independently testable pieces around a single
//! "send message" call: the per-client [`relay_security::RateLimiter`], the
//! backoff [`RetryPolicy`], and the [`classify`] step that folds raw transport
//! failures into [`relay_core::RelayError`].

/// Chat-completion transports.
pub mod backends;
pub mod classify;
/// The rate-limited, retrying chat client.
pub mod client;
/// Client configuration and the supported-model list.
pub mod config;
/// Task personas and their prompts.
pub mod persona;
/// Bounded exponential-backoff retry.
pub mod retry;

pub use backends::openrouter::OpenRouterBackend;
pub use backends::{ChatBackend, ChatCompletion, ChatRequest, TransportFailure};
pub use classify::{classify, classify_failure};
pub use client::ApiClient;
pub use config::{ClientConfig, API_KEY_PREFIX, SUPPORTED_MODELS};
pub use persona::Persona;
pub use retry::RetryPolicy;
