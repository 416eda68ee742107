//! Recognition fragments: the data contract between the recognition engine
//! and the redaction engine.
//!
//! A fragment is one spatially-located piece of recognised text. Fragments are
//! validated once, when they cross into this crate, so that every downstream
//! consumer can rely on a region of exactly four points and a finite score in
//! `[0, 1]`.
//!
//! License: MIT OR APACHE 2.0

use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::errors::InkRedactError;

/// A 2-D integer point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An ordered quadrilateral. Not necessarily axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub fn from_coords(coords: [(i32, i32); 4]) -> Self {
        Quad(coords.map(|(x, y)| Point::new(x, y)))
    }

    /// Axis-aligned rectangle covering all four corners.
    pub fn bounding_rect(&self) -> BoundingRect {
        let xs = self.0.iter().map(|p| p.x);
        let ys = self.0.iter().map(|p| p.y);
        BoundingRect {
            x_min: xs.clone().min().unwrap_or(0),
            x_max: xs.max().unwrap_or(0),
            y_min: ys.clone().min().unwrap_or(0),
            y_max: ys.max().unwrap_or(0),
        }
    }
}

/// Inclusive axis-aligned rectangle `(x_min, y_min)`–`(x_max, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

/// Drawing never needs coordinates further than this outside the image.
const OFFSCREEN_MARGIN: i64 = 16;

fn span(min: i32, max: i32) -> u32 {
    (i64::from(max) - i64::from(min) + 1).clamp(1, i64::from(u32::MAX)) as u32
}

impl BoundingRect {
    pub fn width(&self) -> u32 {
        span(self.x_min, self.x_max)
    }

    pub fn height(&self) -> u32 {
        span(self.y_min, self.y_max)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// The rectangle grown by `by` pixels on every side, saturating at the
    /// `i32` range.
    pub fn expand(&self, by: i32) -> BoundingRect {
        BoundingRect {
            x_min: self.x_min.saturating_sub(by),
            y_min: self.y_min.saturating_sub(by),
            x_max: self.x_max.saturating_add(by),
            y_max: self.y_max.saturating_add(by),
        }
    }

    /// Converts to a drawable rect for an image of `width` x `height`.
    ///
    /// Edges far outside the image are pulled in to just beyond its border:
    /// every on-image pixel covered before is still covered, and an edge that
    /// was off-image stays off-image.
    pub fn to_rect_within(&self, width: u32, height: u32) -> Rect {
        let limit = |extent: u32| {
            let hi = (i64::from(extent) + OFFSCREEN_MARGIN).min(i64::from(i32::MAX));
            move |v: i32| i64::from(v).clamp(-OFFSCREEN_MARGIN, hi) as i32
        };
        let (cx, cy) = (limit(width), limit(height));
        let clipped = BoundingRect {
            x_min: cx(self.x_min),
            y_min: cy(self.y_min),
            x_max: cx(self.x_max),
            y_max: cy(self.y_max),
        };
        Rect::at(clipped.x_min, clipped.y_min).of_size(clipped.width(), clipped.height())
    }
}

/// One OCR-detected text region. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionFragment {
    text: String,
    region: Quad,
    confidence: f64,
}

impl RecognitionFragment {
    /// Builds a fragment, rejecting a confidence that is not finite or lies
    /// outside `[0, 1]`. `index` is the fragment's position in its document and
    /// is only used for the error report.
    pub fn new(
        index: usize,
        text: impl Into<String>,
        region: Quad,
        confidence: f64,
    ) -> Result<Self, InkRedactError> {
        if !confidence.is_finite() {
            return Err(InkRedactError::malformed(
                index,
                format!("confidence score is not finite ({})", confidence),
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(InkRedactError::malformed(
                index,
                format!("confidence score {} is outside [0, 1]", confidence),
            ));
        }
        Ok(Self {
            text: text.into(),
            region,
            confidence,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn region(&self) -> &Quad {
        &self.region
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn bounding_rect(&self) -> BoundingRect {
        self.region.bounding_rect()
    }
}

/// A fragment exactly as a recognition engine emits it, before validation.
///
/// The shape mirrors the common `(bbox, text, score)` triple: `bbox` is a list
/// of `[x, y]` pairs that must contain exactly four points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    #[serde(default)]
    pub text: String,
    pub bbox: Vec<Vec<f64>>,
    pub score: f64,
}

fn in_pixel_range(v: f64) -> bool {
    v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX)
}

impl RawFragment {
    /// Validates the raw record into a [`RecognitionFragment`].
    ///
    /// Coordinates are truncated to integers the same way a pixel cast would.
    pub fn into_fragment(self, index: usize) -> Result<RecognitionFragment, InkRedactError> {
        if self.bbox.len() != 4 {
            return Err(InkRedactError::malformed(
                index,
                format!("region has {} points, expected 4", self.bbox.len()),
            ));
        }

        let mut points = [Point::new(0, 0); 4];
        for (slot, coords) in points.iter_mut().zip(self.bbox.iter()) {
            let [x, y] = coords.as_slice() else {
                return Err(InkRedactError::malformed(
                    index,
                    format!("region point has {} coordinates, expected 2", coords.len()),
                ));
            };
            if !x.is_finite() || !y.is_finite() {
                return Err(InkRedactError::malformed(index, "region point is not finite"));
            }
            if !in_pixel_range(*x) || !in_pixel_range(*y) {
                return Err(InkRedactError::malformed(
                    index,
                    format!("region point ({}, {}) is outside the pixel coordinate range", x, y),
                ));
            }
            *slot = Point::new(*x as i32, *y as i32);
        }

        RecognitionFragment::new(index, self.text, Quad(points), self.score)
    }
}

/// Validates a whole document's worth of raw fragments, failing on the first
/// contract violation.
pub fn validate_fragments(raw: Vec<RawFragment>) -> Result<Vec<RecognitionFragment>, InkRedactError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| r.into_fragment(index))
        .collect()
}
