use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of the participant that authored a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A system-level instruction (the persona prompt).
    System,
    /// A human end-user.
    User,
    /// The AI assistant.
    Assistant,
}

/// One `{role, content}` entry of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,
    /// The textual content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new message with [`Role::System`].
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// A single request to the model, constructed per call and discarded afterwards.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    /// Correlation id used in log lines for this request.
    pub id: Uuid,
    /// The user's message text.
    pub message: String,
    /// Optional persona system prompt.
    pub system_prompt: Option<String>,
    /// Optional model override; the client default is used when absent.
    pub model: Option<String>,
}

impl AgentRequest {
    /// Creates a request for `message` with no persona and no model override.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            system_prompt: None,
            model: None,
        }
    }

    /// Sets the persona system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The ordered message list sent to the endpoint: the system prompt first
    /// (when present and non-blank), then the user message.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = self
            .system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            messages.push(ChatMessage::system(sys));
        }
        messages.push(ChatMessage::user(self.message.as_str()));
        messages
    }
}
