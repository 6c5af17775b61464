//! Core types and error definitions for relay.
//!
//! This crate provides the foundational types shared across all relay crates:
//! the error taxonomy every failure is folded into, and the chat message shapes
//! sent to the completion endpoint.
//!
//! # Main types
//!
//! - [`RelayError`] — Closed error taxonomy (credentials, rate limit, connection, config, ...).
//! - [`RelayResult`] — Convenience alias for `Result<T, RelayError>`.
//! - [`LimitOrigin`] — Whether a rate limit was imposed locally or by the remote API.
//! - [`Role`] — Message role (system, user, assistant).
//! - [`ChatMessage`] — A single `{role, content}` entry of a chat-completion request.
//! - [`AgentRequest`] — One user request: message text, optional persona prompt and model override.

/// Error taxonomy.
pub mod error;
/// Chat message and request types.
pub mod message;

pub use error::{LimitOrigin, RelayError, RelayResult};
pub use message::{AgentRequest, ChatMessage, Role};
