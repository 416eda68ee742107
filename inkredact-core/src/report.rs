// inkredact-core/src/report.rs
//! Document report assembly.
//!
//! The report is the auditable record of one processed document. Its JSON
//! field names are consumed by downstream viewers and must stay stable.
//!
//! Warnings are derived independently of each other; every rule that applies
//! contributes its message. Degenerate documents (nothing recognised, nothing
//! found) still get a complete report.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactPaths;
use crate::findings::PiiFindingSet;
use crate::statistics::{ConfidenceSummary, RedactionStats};

/// Average recognition confidence below which the report warns, independent of
/// the redaction threshold.
pub const LOW_AVG_CONFIDENCE_WARNING: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrSummary {
    pub blocks_total: usize,
    pub confidence: ConfidenceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub document_name: String,
    pub confidence_threshold_for_redaction: f64,
    pub ocr: OcrSummary,
    pub pii_detected: PiiFindingSet,
    pub redaction_stats: RedactionStats,
    pub output_paths: ArtifactPaths,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the source image bytes, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
}

/// Inputs the assembler combines.
#[derive(Debug, Clone)]
pub struct ReportInputs<'a> {
    pub document_name: &'a str,
    pub threshold: f64,
    pub confidence: ConfidenceSummary,
    pub findings: &'a PiiFindingSet,
    pub stats: RedactionStats,
    pub output_paths: &'a ArtifactPaths,
    pub input_sha256: Option<&'a str>,
}

/// Warning messages for a document, in a fixed order.
pub fn derive_warnings(
    stats: &RedactionStats,
    confidence: &ConfidenceSummary,
    findings: &PiiFindingSet,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if stats.total_blocks == 0 {
        warnings.push(
            "No text blocks detected by OCR. Image may be too noisy, blank, or unreadable.".to_string(),
        );
    } else if confidence.avg < LOW_AVG_CONFIDENCE_WARNING {
        warnings.push(format!(
            "Low average OCR confidence ({:.2}). Handwriting quality, lighting, or tilt may be affecting recognition.",
            confidence.avg
        ));
    }

    if findings.is_empty() {
        warnings.push("No PII detected in this document given the current regex rules.".to_string());
    }

    if stats.low_conf_pii_blocks > 0 {
        warnings.push(format!(
            "{} text blocks contained possible PII but had low OCR confidence and were not auto-redacted in the image.",
            stats.low_conf_pii_blocks
        ));
    }

    warnings
}

/// Builds the immutable report. Never fails.
pub fn assemble_report(inputs: ReportInputs<'_>) -> DocumentReport {
    let warnings = derive_warnings(&inputs.stats, &inputs.confidence, inputs.findings);
    DocumentReport {
        document_name: inputs.document_name.to_string(),
        confidence_threshold_for_redaction: inputs.threshold,
        ocr: OcrSummary {
            blocks_total: inputs.stats.total_blocks,
            confidence: inputs.confidence,
        },
        pii_detected: inputs.findings.clone(),
        redaction_stats: inputs.stats,
        output_paths: inputs.output_paths.clone(),
        warnings,
        generated_at: Utc::now(),
        input_sha256: inputs.input_sha256.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::PiiCategory;

    fn stats(total: usize, redacted: usize, flagged: usize) -> RedactionStats {
        RedactionStats {
            total_blocks: total,
            pii_blocks: redacted + flagged,
            redacted_blocks: redacted,
            low_conf_pii_blocks: flagged,
        }
    }

    fn some_findings() -> PiiFindingSet {
        let mut f = PiiFindingSet::new();
        f.insert(PiiCategory::Email, "jane@x.com");
        f
    }

    #[test]
    fn test_zero_fragments_warns_no_text_and_no_pii() {
        let w = derive_warnings(&stats(0, 0, 0), &ConfidenceSummary::default(), &PiiFindingSet::new());
        assert_eq!(w.len(), 2);
        assert!(w[0].starts_with("No text blocks detected"));
        assert!(w[1].starts_with("No PII detected"));
    }

    #[test]
    fn test_low_average_confidence_warning() {
        let conf = ConfidenceSummary { avg: 0.25, min: 0.1, max: 0.4 };
        let w = derive_warnings(&stats(3, 0, 0), &conf, &some_findings());
        assert_eq!(w, vec![
            "Low average OCR confidence (0.25). Handwriting quality, lighting, or tilt may be affecting recognition."
                .to_string()
        ]);
    }

    #[test]
    fn test_low_confidence_pii_warning_carries_count() {
        let conf = ConfidenceSummary { avg: 0.6, min: 0.2, max: 0.9 };
        let w = derive_warnings(&stats(4, 1, 2), &conf, &some_findings());
        assert_eq!(w.len(), 1);
        assert!(w[0].starts_with("2 text blocks contained possible PII"));
        assert!(w[0].contains("not auto-redacted"));
    }

    #[test]
    fn test_clean_document_has_no_warnings() {
        let conf = ConfidenceSummary { avg: 0.9, min: 0.8, max: 1.0 };
        assert!(derive_warnings(&stats(2, 1, 0), &conf, &some_findings()).is_empty());
    }

    #[test]
    fn test_report_json_field_names() {
        let findings = some_findings();
        let paths = ArtifactPaths::for_document(std::path::Path::new("out"), "scan");
        let report = assemble_report(ReportInputs {
            document_name: "scan.jpg",
            threshold: 0.4,
            confidence: ConfidenceSummary { avg: 0.85, min: 0.8, max: 0.9 },
            findings: &findings,
            stats: stats(2, 1, 0),
            output_paths: &paths,
            input_sha256: None,
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["document_name"], "scan.jpg");
        assert_eq!(json["confidence_threshold_for_redaction"], 0.4);
        assert_eq!(json["ocr"]["blocks_total"], 2);
        assert_eq!(json["ocr"]["confidence"]["max"], 0.9);
        assert_eq!(json["pii_detected"]["email"][0], "jane@x.com");
        assert_eq!(json["redaction_stats"]["redacted_blocks"], 1);
        assert_eq!(json["redaction_stats"]["low_conf_pii_blocks"], 0);
        assert_eq!(json["output_paths"]["redacted_image"], "out/scan_redacted.png");
        assert!(json["warnings"].as_array().unwrap().is_empty());
        assert!(json.get("input_sha256").is_none());
    }
}
