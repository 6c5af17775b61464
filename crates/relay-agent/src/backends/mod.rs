/// OpenRouter (OpenAI-compatible) transport.
pub mod openrouter;

use async_trait::async_trait;
use relay_core::ChatMessage;
use serde::{Deserialize, Serialize};

/// Body of one chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Success body of a chat-completion response. Only the fields relay reads are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Convenience constructor: a completion with one choice per text.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: texts
                .into_iter()
                .map(|t| Choice {
                    message: ChoiceMessage {
                        content: Some(t.into()),
                    },
                })
                .collect(),
        }
    }
}

/// A raw failure as reported by a transport, before classification.
///
/// `kind` names the failure category the way the transport reports it
/// (e.g. `ConnectionError`, `StatusError`); `message` is its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: String,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Trait for chat-completion transports.
///
/// One call per attempt; retries, rate limiting and classification happen in
/// [`crate::ApiClient`]. The OpenRouter HTTP transport lives in [`openrouter`];
/// tests plug in stubs.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request and return the decoded completion.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, TransportFailure>;
}
