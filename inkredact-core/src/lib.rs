// inkredact-core/src/lib.rs
//! # inkredact Core Library
//!
//! `inkredact-core` provides the platform-independent logic for redacting
//! personally-identifiable information (PII) from photographed handwritten
//! documents. Its centre is a confidence-gated spatial redaction engine that
//! reconciles two independent signals:
//!
//! * the PII strings found by pattern matching over the recognised text, and
//! * the spatially-located text fragments produced by a recognition engine,
//!   each with its own confidence score.
//!
//! Every fragment receives one decision (ignore, redact, or flag for review),
//! from which a redacted image, a colour-coded preview image, aggregate
//! statistics, and an auditable document report are derived.
//!
//! The library performs no output I/O: it reads input images and fragment
//! sidecars, and returns in-memory artifacts for the caller to persist.
//!
//! ## Modules
//!
//! * `fragment`: Recognition fragments and their validation.
//! * `findings`: The categorised PII Finding Set.
//! * `engine`: The redaction engine and its decision type.
//! * `statistics`: Confidence summary and redaction counts.
//! * `report`: Document report assembly and warning derivation.
//! * `config`: PII rules and pipeline settings (YAML).
//! * `extractor`: Compiled PII rules applied to cleaned text.
//! * `text`: Text cleanup and text redaction.
//! * `preprocess`: Image loading and preparation for recognition.
//! * `recognition`: The `RecognitionEngine` trait and fragment sources.
//! * `artifacts`: Output naming convention.
//! * `pipeline`: The single-document pipeline.
//!
//! ## Usage Example
//!
//! ```rust
//! use inkredact_core::{
//!     PiiCategory, PiiFindingSet, Quad, RecognitionFragment, RedactionDecision, RedactionEngine,
//! };
//! use image::{Rgb, RgbImage};
//!
//! let original = RgbImage::from_pixel(64, 32, Rgb([255, 255, 255]));
//! let fragments = vec![
//!     RecognitionFragment::new(0, "Jane Doe, jane@x.com", Quad::from_coords([(2, 2), (60, 2), (60, 12), (2, 12)]), 0.8).unwrap(),
//!     RecognitionFragment::new(1, "unrelated note", Quad::from_coords([(2, 16), (60, 16), (60, 28), (2, 28)]), 0.9).unwrap(),
//! ];
//! let mut findings = PiiFindingSet::new();
//! findings.insert(PiiCategory::Email, "jane@x.com");
//!
//! let outcome = RedactionEngine::new(0.4).unwrap().redact_image(&original, &fragments, &findings);
//! assert_eq!(outcome.decisions, vec![RedactionDecision::Redact, RedactionDecision::Ignore]);
//! assert_eq!(outcome.stats.redacted_blocks, 1);
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`InkRedactError`]. Configuration loading uses
//! `anyhow::Error` with context.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod artifacts;
pub mod config;
pub mod engine;
pub mod errors;
pub mod extractor;
pub mod findings;
pub mod fragment;
pub mod pipeline;
pub mod preprocess;
pub mod recognition;
pub mod report;
pub mod sensitive_log;
pub mod statistics;
pub mod text;

/// Re-exports the data contracts.
pub use findings::{PiiCategory, PiiFindingSet};
pub use fragment::{validate_fragments, BoundingRect, Point, Quad, RawFragment, RecognitionFragment};

/// Re-exports the custom error type for clear error reporting.
pub use errors::InkRedactError;

/// Re-exports the redaction engine.
pub use engine::{decide, Palette, RedactionDecision, RedactionEngine, RedactionOutcome, DEFAULT_CONF_THRESHOLD};

/// Re-exports statistics and reporting.
pub use report::{assemble_report, derive_warnings, DocumentReport, OcrSummary, ReportInputs, LOW_AVG_CONFIDENCE_WARNING};
pub use statistics::{compute_confidence_summary, ConfidenceSummary, RedactionStats};

/// Re-exports configuration and the supplemented collaborators.
pub use artifacts::ArtifactPaths;
pub use config::{merge_rules, PiiRule, PiiRuleConfig, PipelineConfig, MAX_PATTERN_LENGTH};
pub use extractor::PiiExtractor;
pub use pipeline::{Pipeline, ProcessedDocument};
pub use preprocess::{preprocess, PreparedImage};
pub use recognition::{full_text, FragmentFile, RecognitionEngine, StaticFragments};
pub use text::{clean_text, redact_text};
