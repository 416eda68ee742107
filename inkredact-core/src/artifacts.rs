//! Stable naming of the per-document output artifacts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths of every artifact produced for one document.
///
/// Field names serialise into the report's `output_paths` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub clean_text: PathBuf,
    pub pii_json: PathBuf,
    pub redacted_text: PathBuf,
    pub redacted_image: PathBuf,
    pub ocr_preview_image: PathBuf,
    /// Not part of `output_paths`; the report cannot reference itself.
    #[serde(skip)]
    pub report: PathBuf,
}

impl ArtifactPaths {
    /// `<dir>/<name>_text.txt`, `<dir>/<name>_redacted_text.txt`,
    /// `<dir>/<name>_pii.json`, `<dir>/<name>_redacted.png`,
    /// `<dir>/<name>_ocr_preview.png`, `<dir>/<name>_report.json`.
    pub fn for_document(output_dir: &Path, name: &str) -> Self {
        let path = |suffix: &str| output_dir.join(format!("{}{}", name, suffix));
        Self {
            clean_text: path("_text.txt"),
            pii_json: path("_pii.json"),
            redacted_text: path("_redacted_text.txt"),
            redacted_image: path("_redacted.png"),
            ocr_preview_image: path("_ocr_preview.png"),
            report: path("_report.json"),
        }
    }

    /// Uses the input file's stem as the document name.
    pub fn for_input(output_dir: &Path, input: &Path) -> Self {
        let name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Self::for_document(output_dir, &name)
    }
}
