//! Log Redaction Layer
//!
//! Scrubs agent API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(sk_[a-zA-Z0-9]{16,})|(sk-[a-zA-Z0-9]{32,})").unwrap());
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(xi-api-key[:=]\s*|Bearer\s+)[a-zA-Z0-9\-\._~+/]+=*").unwrap()
});

/// Redacts credentials in a string.
pub fn redact_secrets(input: &str) -> String {
    let redacted = HEADER_RE.replace_all(input, "${1}[REDACTED_TOKEN]");
    API_KEY_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_api_key() {
        let raw = "starting session with sk_4f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c";
        let clean = redact_secrets(raw);
        assert!(!clean.contains("sk_4f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn test_redacts_header_value() {
        let clean = redact_secrets("xi-api-key: abcdef123456 Bearer eyJhbGciOiJIUzI1NiJ9");
        assert_eq!(clean, "xi-api-key: [REDACTED_TOKEN] Bearer [REDACTED_TOKEN]");
    }

    #[test]
    fn test_plain_text_untouched() {
        let raw = "Tell me about your approach to problem-solving.";
        assert_eq!(redact_secrets(raw), raw);
    }
}
