/// Maximum accepted input length, in characters.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 10_000;

/// Input sanitizer applied to user text before it is sent to the model.
pub struct Sanitizer {
    max_input_length: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
        }
    }
}

impl Sanitizer {
    pub fn new(max_input_length: usize) -> Self {
        Self { max_input_length }
    }

    /// Sanitize user input: enforce the length limit on the raw text, trim
    /// surrounding whitespace, then strip ASCII control characters other than
    /// newlines, tabs and carriage returns.
    pub fn sanitize(&self, input: &str) -> SanitizeResult {
        if input.chars().count() > self.max_input_length {
            return SanitizeResult::Rejected(format!(
                "Input too long (maximum: {} characters)",
                self.max_input_length
            ));
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return SanitizeResult::Rejected("Input must not be empty".to_string());
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !c.is_ascii_control() || matches!(c, '\n' | '\t' | '\r'))
            .collect();

        if cleaned.trim().is_empty() {
            return SanitizeResult::Rejected("Input contains only control characters".to_string());
        }

        if cleaned != input {
            SanitizeResult::Cleaned(cleaned)
        } else {
            SanitizeResult::Clean(cleaned)
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SanitizeResult {
    /// Input was already clean.
    Clean(String),
    /// Input was trimmed or had control characters removed.
    Cleaned(String),
    /// Input was rejected entirely; carries the reason.
    Rejected(String),
}

impl SanitizeResult {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SanitizeResult::Rejected(_))
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            SanitizeResult::Clean(s) | SanitizeResult::Cleaned(s) => Some(s),
            SanitizeResult::Rejected(_) => None,
        }
    }

    /// Converts into the sanitized text, or the rejection reason as an error.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            SanitizeResult::Clean(s) | SanitizeResult::Cleaned(s) => Ok(s),
            SanitizeResult::Rejected(reason) => Err(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input() {
        let s = Sanitizer::default();
        let result = s.sanitize("Hello world\nNew line");
        assert!(matches!(result, SanitizeResult::Clean(_)));
    }

    #[test]
    fn test_control_chars_stripped() {
        let s = Sanitizer::default();
        let result = s.sanitize("Hello\x00\x01\x02World\x7f");
        assert_eq!(result, SanitizeResult::Cleaned("HelloWorld".to_string()));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let s = Sanitizer::default();
        let result = s.sanitize("  notes from standup \n");
        assert_eq!(
            result,
            SanitizeResult::Cleaned("notes from standup".to_string())
        );
    }

    #[test]
    fn test_tabs_and_newlines_kept() {
        let s = Sanitizer::default();
        let result = s.sanitize("a\tb\r\nc");
        assert_eq!(result.into_string().as_deref(), Some("a\tb\r\nc"));
    }

    #[test]
    fn test_empty_rejection() {
        let s = Sanitizer::default();
        assert!(s.sanitize("").is_rejected());
        assert!(s.sanitize("   \n\t").is_rejected());
        assert!(s.sanitize("\x01\x02").is_rejected());
    }

    #[test]
    fn test_length_rejection() {
        let s = Sanitizer::new(10);
        let result = s.sanitize("This is too long for the limit");
        assert_eq!(
            result.into_result(),
            Err("Input too long (maximum: 10 characters)".to_string())
        );
    }

    #[test]
    fn test_length_checked_before_trimming() {
        let s = Sanitizer::new(10);
        assert!(s.sanitize("   padded    ").is_rejected());
        assert!(!s.sanitize("  padded  ").is_rejected());
    }

    #[test]
    fn test_non_ascii_controls_kept() {
        let s = Sanitizer::default();
        let result = s.sanitize("caf\u{e9} \u{85}next\x1b[0m");
        assert_eq!(
            result,
            SanitizeResult::Cleaned("caf\u{e9} \u{85}next[0m".to_string())
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let s = Sanitizer::new(5);
        assert!(!s.sanitize("ééééé").is_rejected());
    }
}
