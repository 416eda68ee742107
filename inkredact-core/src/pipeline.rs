// inkredact-core/src/pipeline.rs
//! Single-document pipeline.
//!
//! Stages run strictly in order, each fully materialising its output:
//! prepare image, recognise, clean text, extract PII, redact text, redact
//! image, summarise confidence, assemble report. Nothing is written to disk
//! here; persistence belongs to the caller.
//!
//! License: MIT OR APACHE 2.0

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::artifacts::ArtifactPaths;
use crate::engine::{RedactionEngine, RedactionOutcome};
use crate::errors::InkRedactError;
use crate::extractor::PiiExtractor;
use crate::findings::PiiFindingSet;
use crate::fragment::RecognitionFragment;
use crate::preprocess::{preprocess, PreparedImage};
use crate::recognition::{full_text, RecognitionEngine};
use crate::report::{assemble_report, DocumentReport, ReportInputs};
use crate::statistics::compute_confidence_summary;
use crate::text::{clean_text, redact_text};

/// Everything produced for one document, ready to be persisted.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub fragments: Vec<RecognitionFragment>,
    pub cleaned_text: String,
    pub redacted_text: String,
    pub findings: PiiFindingSet,
    pub redaction: RedactionOutcome,
    pub paths: ArtifactPaths,
    pub report: DocumentReport,
}

/// Shared, immutable per-run settings. Cheap to clone; one per worker is fine.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: Arc<PiiExtractor>,
    engine: RedactionEngine,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<PiiExtractor>,
        threshold: f64,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, InkRedactError> {
        Ok(Self {
            extractor,
            engine: RedactionEngine::new(threshold)?,
            output_dir: output_dir.into(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.engine.threshold()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Loads `image_path` and runs every stage.
    pub fn process(
        &self,
        image_path: &Path,
        recognizer: &dyn RecognitionEngine,
    ) -> Result<ProcessedDocument, InkRedactError> {
        let prepared = preprocess(image_path)?;
        let document_name = image_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| image_path.display().to_string());
        let paths = ArtifactPaths::for_input(&self.output_dir, image_path);
        self.process_prepared(&document_name, &prepared, recognizer, paths)
    }

    /// Runs every stage after image loading.
    pub fn process_prepared(
        &self,
        document_name: &str,
        prepared: &PreparedImage,
        recognizer: &dyn RecognitionEngine,
        paths: ArtifactPaths,
    ) -> Result<ProcessedDocument, InkRedactError> {
        info!(
            "Processing '{}' with recognizer '{}' at threshold {}.",
            document_name,
            recognizer.name(),
            self.engine.threshold()
        );

        let fragments = recognizer.recognize(&prepared.processed)?;
        let cleaned_text = clean_text(&full_text(&fragments));
        let findings = self.extractor.extract(&cleaned_text);
        let redacted_text = redact_text(&cleaned_text, &findings);
        let redaction = self
            .engine
            .redact_image(&prepared.original, &fragments, &findings);
        let confidence = compute_confidence_summary(&fragments);

        let report = assemble_report(ReportInputs {
            document_name,
            threshold: self.engine.threshold(),
            confidence,
            findings: &findings,
            stats: redaction.stats,
            output_paths: &paths,
            input_sha256: Some(&prepared.source_sha256),
        });
        for w in &report.warnings {
            info!("{}: {}", document_name, w);
        }

        Ok(ProcessedDocument {
            fragments,
            cleaned_text,
            redacted_text,
            findings,
            redaction,
            paths,
            report,
        })
    }
}
