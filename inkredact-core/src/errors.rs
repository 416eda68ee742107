//! errors.rs - Custom error types for the inkredact-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// This enum represents all possible error types in the `inkredact-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InkRedactError {
    /// A recognition fragment violated the data contract (bad region or score).
    /// The whole document fails; the fragment is never skipped.
    #[error("Malformed recognition fragment #{index}: {reason}")]
    MalformedFragment { index: usize, reason: String },

    #[error("Redaction threshold must be a finite value in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Could not read image at {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to compile PII rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Failed to serialize or parse structured data: {0}")]
    SerializationError(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

impl InkRedactError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        InkRedactError::MalformedFragment {
            index,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for InkRedactError {
    fn from(err: serde_json::Error) -> Self {
        InkRedactError::SerializationError(err.to_string())
    }
}
