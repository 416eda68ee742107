//! Text-level helpers: cleanup of raw recognised text and replacement of
//! findings in the cleaned text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::findings::PiiFindingSet;

/// Replacement token for redacted text.
pub const REDACTION_TOKEN: &str = "[REDACTED]";

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r" {2,}").expect("static regex");
    static ref MULTI_NEWLINE: Regex = Regex::new(r"\n{3,}").expect("static regex");
}

/// Removes stray separator characters, collapses runs of spaces, limits blank
/// lines to one, and trims the result.
pub fn clean_text(text: &str) -> String {
    let text = text.replace(['|', '\t'], " ");
    let text = MULTI_SPACE.replace_all(&text, " ");
    let text = MULTI_NEWLINE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Replaces every occurrence of every finding with [`REDACTION_TOKEN`].
/// Categories are applied in report order, values in first-occurrence order.
pub fn redact_text(text: &str, findings: &PiiFindingSet) -> String {
    let mut redacted = text.to_string();
    for (_, values) in findings.iter() {
        for value in values.iter().filter(|v| !v.is_empty()) {
            redacted = redacted.replace(value.as_str(), REDACTION_TOKEN);
        }
    }
    redacted
}
