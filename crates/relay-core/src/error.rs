use std::time::Duration;

/// A convenience `Result` alias using [`RelayError`].
pub type RelayResult<T> = Result<T, RelayError>;

/// Where a rate limit was imposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitOrigin {
    /// Rejected by the client's own sliding-window limiter before any network activity.
    Local {
        /// Calls admitted per window.
        max_calls: usize,
        /// Length of the sliding window.
        window: Duration,
    },
    /// Reported by the remote API (HTTP 429 or a "rate limit" message).
    Remote,
}

/// Top-level error type for relay.
///
/// Raw transport failures are folded into one of these variants by the
/// classifier in `relay-agent`; nothing past that boundary sees the
/// underlying HTTP error type.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The API key was rejected (HTTP 401 / "Unauthorized") or is syntactically invalid.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Too many requests, either locally or remotely.
    #[error("{message}")]
    RateLimited {
        /// Human-readable description.
        message: String,
        /// Who imposed the limit.
        origin: LimitOrigin,
    },

    /// The request could not reach the API or timed out.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other failure; the message is preserved verbatim.
    #[error("Request failed: {0}")]
    Unclassified(String),

    /// Invalid configuration or input (unsupported model, empty message, missing key).
    #[error("Config error: {0}")]
    Config(String),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Builds the error raised by the local sliding-window limiter.
    pub fn local_rate_limit(max_calls: usize, window: Duration) -> Self {
        Self::RateLimited {
            message: format!(
                "Rate limit exceeded: {max_calls} calls per {}s",
                window.as_secs()
            ),
            origin: LimitOrigin::Local { max_calls, window },
        }
    }

    /// Builds the error for a rate limit reported by the remote API.
    pub fn remote_rate_limit() -> Self {
        Self::RateLimited {
            message: "Rate limit exceeded, try again later".to_string(),
            origin: LimitOrigin::Remote,
        }
    }

    /// Whether a retry may succeed.
    ///
    /// Connection failures and remote rate limits are transient. A local limiter
    /// rejection is not: retrying it immediately would defeat the limiter.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::RateLimited { origin, .. } => *origin == LimitOrigin::Remote,
            _ => false,
        }
    }

    /// Whether the caller should ask the user for a new API key.
    pub fn is_credentials_related(&self) -> bool {
        matches!(self, Self::InvalidCredentials(_))
    }
}
