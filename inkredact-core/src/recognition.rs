// inkredact-core/src/recognition.rs
//! The seam between the pipeline and an optical-recognition engine.
//!
//! The redaction engine only ever sees already-recognised fragments, so it
//! makes no assumption about how (or when) a recognition model is loaded.
//! Implementations of [`RecognitionEngine`] range from a full OCR backend to a
//! sidecar JSON file produced by an external tool, or a fixed list in tests.
//!
//! License: MIT OR APACHE 2.0

use std::path::{Path, PathBuf};

use image::GrayImage;
use log::{debug, info};

use crate::errors::InkRedactError;
use crate::fragment::{validate_fragments, RawFragment, RecognitionFragment};

/// Produces the ordered fragment list for one processed image.
///
/// Implementations must be `Send + Sync` so a batch driver can hand one to a
/// worker per document.
pub trait RecognitionEngine: Send + Sync {
    /// Recognises text in `image`. A malformed fragment fails the whole call.
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognitionFragment>, InkRedactError>;

    /// Short human-readable name for logs.
    fn name(&self) -> &str;
}

/// Newline-joined fragment text, in fragment order.
pub fn full_text(fragments: &[RecognitionFragment]) -> String {
    fragments
        .iter()
        .map(RecognitionFragment::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads fragments from a JSON sidecar of `{"text", "bbox", "score"}` records.
#[derive(Debug, Clone)]
pub struct FragmentFile {
    path: PathBuf,
}

impl FragmentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional sidecar location for an image: `<image path>.fragments.json`.
    pub fn sidecar_for(image_path: &Path) -> Self {
        let mut name = image_path.as_os_str().to_owned();
        name.push(".fragments.json");
        Self::new(PathBuf::from(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses and validates the sidecar.
    ///
    /// A file that is not a JSON array is a `SerializationError`; a record
    /// with missing or mistyped fields is a `MalformedFragment` at its index.
    pub fn load(&self) -> Result<Vec<RecognitionFragment>, InkRedactError> {
        debug!("Reading recognition fragments from {}", self.path.display());
        let text = std::fs::read_to_string(&self.path)?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&text)?;
        let fragments = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let raw: RawFragment = serde_json::from_value(record).map_err(|e| {
                    InkRedactError::malformed(index, format!("invalid fragment record: {}", e))
                })?;
                raw.into_fragment(index)
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Loaded {} fragments from {}.",
            fragments.len(),
            self.path.display()
        );
        Ok(fragments)
    }
}

impl RecognitionEngine for FragmentFile {
    fn recognize(&self, _image: &GrayImage) -> Result<Vec<RecognitionFragment>, InkRedactError> {
        self.load()
    }

    fn name(&self) -> &str {
        "fragment-file"
    }
}

/// Returns a fixed fragment list regardless of the image.
#[derive(Debug, Clone, Default)]
pub struct StaticFragments {
    fragments: Vec<RecognitionFragment>,
}

impl StaticFragments {
    pub fn new(fragments: Vec<RecognitionFragment>) -> Self {
        Self { fragments }
    }

    /// Validates raw records up front so contract violations surface at construction.
    pub fn from_raw(raw: Vec<RawFragment>) -> Result<Self, InkRedactError> {
        Ok(Self::new(validate_fragments(raw)?))
    }
}

impl RecognitionEngine for StaticFragments {
    fn recognize(&self, _image: &GrayImage) -> Result<Vec<RecognitionFragment>, InkRedactError> {
        Ok(self.fragments.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sidecar_path() {
        let file = FragmentFile::sidecar_for(Path::new("samples/note.jpg"));
        assert_eq!(file.path(), Path::new("samples/note.jpg.fragments.json"));
    }

    #[test]
    fn test_fragment_file_round_trip() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"text": "Jane Doe", "bbox": [[1,2],[30,2],[30,12],[1,12]], "score": 0.91}},
               {{"text": "", "bbox": [[0,0],[1,0],[1,1],[0,1]], "score": 0.0}}]"#
        )?;
        let fragments = FragmentFile::new(file.path()).recognize(&GrayImage::new(1, 1))?;
        assert_eq!(fragments.len(), 2);
        assert_eq!(full_text(&fragments), "Jane Doe\n");
        Ok(())
    }

    #[test]
    fn test_fragment_file_malformed_region() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"[{{"text": "x", "bbox": [[1,2],[3,4]], "score": 0.5}}]"#)?;
        let err = FragmentFile::new(file.path()).load().unwrap_err();
        assert!(matches!(err, InkRedactError::MalformedFragment { index: 0, .. }));
        Ok(())
    }

    #[test]
    fn test_fragment_file_record_without_score_is_malformed() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"text": "ok", "bbox": [[0,0],[1,0],[1,1],[0,1]], "score": 0.5}},
               {{"text": "x", "bbox": [[0,0],[1,0],[1,1],[0,1]]}}]"#
        )?;
        match FragmentFile::new(file.path()).load().unwrap_err() {
            InkRedactError::MalformedFragment { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("score"));
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_fragment_file_not_an_array_is_serialization_error() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"text": "x"}}"#)?;
        let err = FragmentFile::new(file.path()).load().unwrap_err();
        assert!(matches!(err, InkRedactError::SerializationError(_)));
        Ok(())
    }

    #[test]
    fn test_fragment_file_missing_is_io_error() {
        let err = FragmentFile::new("/no/such/fragments.json").load().unwrap_err();
        assert!(matches!(err, InkRedactError::IoError(_)));
    }
}
