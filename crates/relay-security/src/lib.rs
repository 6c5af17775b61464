//! Local safeguards applied before a request leaves the machine.
//!
//! # Main types
//!
//! - [`RateLimiter`] — Sliding-window limiter owned by each API client.
//! - [`RateLimitConfig`] — Serializable limiter settings.
//! - [`Sanitizer`] — Input sanitization (trim, length limit, control characters).
//! - [`mask_api_key`] / [`has_key_prefix`] — API-key helpers.

/// API-key helpers.
pub mod credentials;
/// Sliding-window rate limiting.
pub mod rate_limit;
/// Input sanitization utilities.
pub mod sanitizer;

pub use credentials::{has_key_prefix, mask_api_key};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use sanitizer::{SanitizeResult, Sanitizer, DEFAULT_MAX_INPUT_LENGTH};
