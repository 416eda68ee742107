// inkredact-core/src/engine.rs
//! The confidence-gated spatial redaction engine.
//!
//! The engine correlates two independent signals: the PII strings found in a
//! document's text, and the spatially-located fragments the recognition engine
//! produced, each carrying its own confidence. Every fragment receives exactly
//! one [`RedactionDecision`]:
//!
//! * `Ignore` - the fragment contains none of the sensitive strings.
//! * `Redact` - it contains one and its confidence is at or above the threshold.
//!   Its bounding rectangle is filled solid on the redacted image.
//! * `Flag` - it contains one but its confidence is below the threshold. The
//!   redacted image is left alone and the preview marks it for manual review.
//!
//! Matching is exact, case-sensitive substring containment evaluated per
//! fragment. A PII value split across two fragments (a line break in the middle
//! of an e-mail address, for instance) is not detected in either of them; that
//! false-negative source is known and intentionally left as is, since changing
//! it would change what an audit of the output means.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeSet;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::InkRedactError;
use crate::findings::PiiFindingSet;
use crate::fragment::{validate_fragments, BoundingRect, RawFragment, RecognitionFragment};
use crate::sensitive_log::log_fragment_decision_debug;
use crate::statistics::RedactionStats;

/// Default confidence threshold for physically redacting a PII-bearing fragment.
pub const DEFAULT_CONF_THRESHOLD: f64 = 0.4;

/// What happens to one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedactionDecision {
    Ignore,
    Redact,
    Flag,
}

impl RedactionDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionDecision::Ignore => "IGNORE",
            RedactionDecision::Redact => "REDACT",
            RedactionDecision::Flag => "FLAG",
        }
    }
}

/// Pure decision function: depends only on its arguments.
pub fn decide(
    text: &str,
    confidence: f64,
    sensitive_strings: &BTreeSet<&str>,
    threshold: f64,
) -> RedactionDecision {
    let has_pii = sensitive_strings.iter().any(|s| text.contains(s));
    match (has_pii, confidence >= threshold) {
        (false, _) => RedactionDecision::Ignore,
        (true, true) => RedactionDecision::Redact,
        (true, false) => RedactionDecision::Flag,
    }
}

/// Colours and stroke weights used when rendering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Occlusion colour for redacted regions.
    pub fill: Rgb<u8>,
    /// Preview outline for fragments without PII.
    pub ignore: Rgb<u8>,
    /// Preview outline for redacted fragments.
    pub redact: Rgb<u8>,
    /// Preview outline for PII fragments held back by low confidence.
    pub flag: Rgb<u8>,
    pub marker_thickness: u32,
    pub border_thickness: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fill: Rgb([0, 0, 0]),
            ignore: Rgb([0, 255, 0]),
            redact: Rgb([255, 0, 0]),
            flag: Rgb([255, 255, 0]),
            marker_thickness: 1,
            border_thickness: 2,
        }
    }
}

/// Everything the engine produces for one image.
#[derive(Debug, Clone)]
pub struct RedactionOutcome {
    pub redacted_image: RgbImage,
    pub preview_image: RgbImage,
    pub stats: RedactionStats,
    /// One decision per input fragment, in input order.
    pub decisions: Vec<RedactionDecision>,
}

#[derive(Debug, Clone)]
pub struct RedactionEngine {
    threshold: f64,
    palette: Palette,
}

impl RedactionEngine {
    /// Creates an engine with the default palette. Rejects thresholds outside `[0, 1]`.
    pub fn new(threshold: f64) -> Result<Self, InkRedactError> {
        Self::with_palette(threshold, Palette::default())
    }

    pub fn with_palette(threshold: f64, palette: Palette) -> Result<Self, InkRedactError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(InkRedactError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold, palette })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Decisions for every fragment, without rendering anything.
    pub fn decisions(
        &self,
        fragments: &[RecognitionFragment],
        findings: &PiiFindingSet,
    ) -> Vec<RedactionDecision> {
        let sensitive = findings.sensitive_strings();
        fragments
            .iter()
            .map(|f| decide(f.text(), f.confidence(), &sensitive, self.threshold))
            .collect()
    }

    /// Decides every fragment and renders the redacted and preview images.
    ///
    /// `original` is only read; both returned images are fresh copies.
    pub fn redact_image(
        &self,
        original: &RgbImage,
        fragments: &[RecognitionFragment],
        findings: &PiiFindingSet,
    ) -> RedactionOutcome {
        let sensitive = findings.sensitive_strings();
        debug!(
            "Redacting {} fragments against {} sensitive strings (threshold {}).",
            fragments.len(),
            sensitive.len(),
            self.threshold
        );

        let mut redacted_image = original.clone();
        let mut preview_image = original.clone();
        let mut stats = RedactionStats::default();
        let mut decisions = Vec::with_capacity(fragments.len());

        for (index, fragment) in fragments.iter().enumerate() {
            let decision = decide(fragment.text(), fragment.confidence(), &sensitive, self.threshold);
            let rect = fragment.bounding_rect();
            log_fragment_decision_debug(
                module_path!(),
                index,
                fragment.text(),
                fragment.confidence(),
                decision.as_str(),
            );

            match decision {
                RedactionDecision::Ignore => {
                    draw_border(&mut preview_image, rect, self.palette.ignore, self.palette.marker_thickness);
                }
                RedactionDecision::Redact => {
                    let (w, h) = redacted_image.dimensions();
                    draw_filled_rect_mut(&mut redacted_image, rect.to_rect_within(w, h), self.palette.fill);
                    draw_border(&mut preview_image, rect, self.palette.redact, self.palette.border_thickness);
                }
                RedactionDecision::Flag => {
                    draw_border(&mut preview_image, rect, self.palette.flag, self.palette.border_thickness);
                }
            }

            stats.record(decision);
            decisions.push(decision);
        }

        info!(
            "Redaction complete: {} blocks, {} with PII, {} redacted, {} flagged for review.",
            stats.total_blocks, stats.pii_blocks, stats.redacted_blocks, stats.low_conf_pii_blocks
        );

        RedactionOutcome {
            redacted_image,
            preview_image,
            stats,
            decisions,
        }
    }

    /// Validates raw recognition output and redacts in one step. A malformed
    /// fragment fails the call before any image is produced.
    pub fn redact_raw(
        &self,
        original: &RgbImage,
        raw_fragments: Vec<RawFragment>,
        findings: &PiiFindingSet,
    ) -> Result<RedactionOutcome, InkRedactError> {
        let fragments = validate_fragments(raw_fragments)?;
        Ok(self.redact_image(original, &fragments, findings))
    }
}

impl Default for RedactionEngine {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONF_THRESHOLD,
            palette: Palette::default(),
        }
    }
}

/// Outline of `thickness` pixels, growing outward from the bounding rectangle.
fn draw_border(image: &mut RgbImage, rect: BoundingRect, color: Rgb<u8>, thickness: u32) {
    let (w, h) = image.dimensions();
    for t in 0..thickness.max(1) {
        let grown = rect.expand(i32::try_from(t).unwrap_or(i32::MAX));
        draw_hollow_rect_mut(image, grown.to_rect_within(w, h), color);
    }
}
