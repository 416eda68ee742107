//! Aggregate numbers reported for a document: recognition-confidence summary
//! and per-decision redaction counts.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};

use crate::fragment::RecognitionFragment;

/// Average, minimum and maximum fragment confidence for one document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarises fragment confidences. Zero fragments yield `{0, 0, 0}`.
pub fn compute_confidence_summary(fragments: &[RecognitionFragment]) -> ConfidenceSummary {
    if fragments.is_empty() {
        return ConfidenceSummary::default();
    }

    let scores = fragments.iter().map(RecognitionFragment::confidence);
    let sum: f64 = scores.clone().sum();
    let min = scores.clone().fold(f64::INFINITY, f64::min);
    let max = scores.fold(f64::NEG_INFINITY, f64::max);

    ConfidenceSummary {
        avg: sum / fragments.len() as f64,
        min,
        max,
    }
}

/// Counts derived from the per-fragment redaction decisions.
///
/// `pii_blocks == redacted_blocks + low_conf_pii_blocks` and
/// `pii_blocks <= total_blocks` hold for every value built through
/// [`RedactionStats::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct RedactionStats {
    pub total_blocks: usize,
    pub pii_blocks: usize,
    pub redacted_blocks: usize,
    pub low_conf_pii_blocks: usize,
}

impl RedactionStats {
    pub fn record(&mut self, decision: crate::engine::RedactionDecision) {
        use crate::engine::RedactionDecision;

        self.total_blocks += 1;
        match decision {
            RedactionDecision::Ignore => {}
            RedactionDecision::Redact => {
                self.pii_blocks += 1;
                self.redacted_blocks += 1;
            }
            RedactionDecision::Flag => {
                self.pii_blocks += 1;
                self.low_conf_pii_blocks += 1;
            }
        }
    }

    /// Fragments that contained no PII.
    pub fn clean_blocks(&self) -> usize {
        self.total_blocks - self.pii_blocks
    }
}
