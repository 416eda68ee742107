//! PII-safe logging helpers and content hashing used for audit records.
//!
//! Recognised text is the very data being protected, so anything that could
//! echo it into a log goes through [`loggable`] first.

use lazy_static::lazy_static;
use log::debug;
use sha2::{Digest, Sha256};

lazy_static! {
    /// Initialised once: whether raw PII may appear in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("INKREDACT_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.chars().count() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.chars().count())
    }
}

/// The text itself when `INKREDACT_ALLOW_DEBUG_PII=true`, a placeholder otherwise.
pub fn loggable(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_fragment_decision_debug(
    module_path: &str,
    index: usize,
    text: &str,
    confidence: f64,
    decision: &str,
) {
    debug!(
        "{} Fragment #{}: text='{}', confidence={:.3}, decision={}",
        module_path,
        index,
        loggable(text),
        confidence,
        decision
    );
}

/// Hex-encoded SHA-256 of `bytes`, recorded in reports to pin the exact input.
pub fn content_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("jane@x.com"), "[REDACTED: 10 chars]".to_string());
    }

    #[test]
    fn test_content_sha256_known_value() {
        assert_eq!(
            content_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
