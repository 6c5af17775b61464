//! Maps raw transport failures onto the closed [`RelayError`] taxonomy.
//!
//! Matching is substring-based over the transport's message and kind name.
//! Checks run in a fixed order, which is also the tie-break: credentials,
//! then rate limit, then connection, then the unclassified fallback.

use crate::backends::TransportFailure;
use relay_core::RelayError;

/// Classify a raw failure given its kind name and message text.
pub fn classify(kind: &str, message: &str) -> RelayError {
    let lower = message.to_lowercase();

    if message.contains("401") || message.contains("Unauthorized") {
        return RelayError::InvalidCredentials("API key invalid or unauthorized".to_string());
    }

    if message.contains("429") || lower.contains("rate limit") {
        return RelayError::remote_rate_limit();
    }

    if kind.contains("Connection") || lower.contains("timeout") {
        return RelayError::Connection(message.to_string());
    }

    RelayError::Unclassified(message.to_string())
}

/// Classify a [`TransportFailure`].
pub fn classify_failure(failure: &TransportFailure) -> RelayError {
    classify(&failure.kind, &failure.message)
}

impl From<TransportFailure> for RelayError {
    fn from(failure: TransportFailure) -> Self {
        classify_failure(&failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::LimitOrigin;

    #[test]
    fn credentials() {
        assert!(matches!(
            classify("StatusError", "HTTP 401 Unauthorized: {}"),
            RelayError::InvalidCredentials(_)
        ));
        assert!(matches!(
            classify("AuthenticationError", "Unauthorized"),
            RelayError::InvalidCredentials(_)
        ));
    }

    #[test]
    fn rate_limit_is_remote() {
        for msg in ["HTTP 429 Too Many Requests", "Rate Limit reached for model"] {
            match classify("StatusError", msg) {
                RelayError::RateLimited { origin, .. } => assert_eq!(origin, LimitOrigin::Remote),
                other => panic!("Expected RateLimited for {msg:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn connection_by_kind_or_timeout() {
        assert!(matches!(
            classify("ConnectionError", "Connection refused"),
            RelayError::Connection(_)
        ));
        assert!(matches!(
            classify("RequestError", "request TIMEOUT after 30s"),
            RelayError::Connection(_)
        ));
        assert_eq!(
            classify("APIConnectionError", "tcp reset").to_string(),
            "Connection error: tcp reset"
        );
    }

    #[test]
    fn fallback_preserves_message() {
        match classify("DecodeError", "expected value at line 1 column 1") {
            RelayError::Unclassified(msg) => assert_eq!(msg, "expected value at line 1 column 1"),
            other => panic!("Expected Unclassified, got {other:?}"),
        }
    }

    #[test]
    fn check_order_is_the_tie_break() {
        // credentials beat everything
        assert!(matches!(
            classify("ConnectionError", "401 while waiting: timeout, rate limit 429"),
            RelayError::InvalidCredentials(_)
        ));
        // rate limit beats connection
        assert!(matches!(
            classify("ConnectionError", "429 timeout"),
            RelayError::RateLimited { .. }
        ));
        // kind alone is enough for connection
        assert!(matches!(
            classify("ConnectionError", "something odd"),
            RelayError::Connection(_)
        ));
    }

    #[test]
    fn deterministic() {
        let failure = TransportFailure::new("StatusError", "HTTP 503 Service Unavailable");
        let a = classify_failure(&failure).to_string();
        let b = RelayError::from(failure).to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn case_sensitive_credential_match() {
        // "unauthorized" in lowercase is not a credentials marker
        assert!(matches!(
            classify("StatusError", "unauthorized scope"),
            RelayError::Unclassified(_)
        ));
    }
}
