//! Persists the artifacts of a processed document.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

use inkredact_core::ProcessedDocument;

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    write_text(path, &json)
}

/// Writes the six artifacts named by `doc.paths`, creating the output
/// directory when needed. The report is written last.
pub fn write_artifacts(doc: &ProcessedDocument) -> Result<()> {
    let paths = &doc.paths;
    if let Some(dir) = paths.report.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    write_text(&paths.clean_text, &doc.cleaned_text)?;
    write_text(&paths.redacted_text, &doc.redacted_text)?;
    write_json(&paths.pii_json, &doc.findings)?;
    doc.redaction
        .redacted_image
        .save(&paths.redacted_image)
        .with_context(|| format!("Failed to write {}", paths.redacted_image.display()))?;
    doc.redaction
        .preview_image
        .save(&paths.ocr_preview_image)
        .with_context(|| format!("Failed to write {}", paths.ocr_preview_image.display()))?;
    write_json(&paths.report, &doc.report)?;

    debug!("Wrote artifacts for '{}' to {}", doc.report.document_name, paths.report.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use inkredact_core::{
        ArtifactPaths, PiiExtractor, Pipeline, PreparedImage, StaticFragments,
    };
    use std::sync::Arc;

    #[test]
    fn test_write_artifacts_creates_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/outputs");
        let original = RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]));
        let prepared = PreparedImage {
            processed: image::imageops::grayscale(&original),
            original,
            source_sha256: "ab".repeat(32),
        };
        let pipeline =
            Pipeline::new(Arc::new(PiiExtractor::with_default_rules().unwrap()), 0.4, out.clone()).unwrap();
        let doc = pipeline
            .process_prepared(
                "blank.png",
                &prepared,
                &StaticFragments::new(Vec::new()),
                ArtifactPaths::for_document(&out, "blank"),
            )
            .unwrap();

        write_artifacts(&doc).unwrap();

        let paths = &doc.paths;
        for p in [
            &paths.clean_text,
            &paths.redacted_text,
            &paths.pii_json,
            &paths.redacted_image,
            &paths.ocr_preview_image,
            &paths.report,
        ] {
            assert!(p.exists(), "{} missing", p.display());
        }
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.report).unwrap()).unwrap();
        assert_eq!(report["document_name"], "blank.png");
        assert_eq!(report["redaction_stats"]["total_blocks"], 0);
        assert!(report["output_paths"].get("report").is_none());
    }
}
