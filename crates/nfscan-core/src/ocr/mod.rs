//! Text extraction boundary.
//!
//! Extractors turn a stored document into ordered text lines. The OCR
//! engine reads images; the sidecar extractor reads text that was
//! extracted elsewhere and stored next to the image as `<file>.txt`.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::{OcrTextExtractor, PureOcrEngine};

use tracing::debug;

use crate::error::ExtractionError;
use crate::storage::ObjectStore;

/// Produces the ordered text lines of a stored document.
pub trait TextExtractor: Send + Sync {
    fn extract_lines(&self, bucket: &str, file_name: &str) -> Result<Vec<String>, ExtractionError>;
}

impl<T: TextExtractor + ?Sized> TextExtractor for Box<T> {
    fn extract_lines(&self, bucket: &str, file_name: &str) -> Result<Vec<String>, ExtractionError> {
        (**self).extract_lines(bucket, file_name)
    }
}

impl<T: TextExtractor + ?Sized> TextExtractor for &T {
    fn extract_lines(&self, bucket: &str, file_name: &str) -> Result<Vec<String>, ExtractionError> {
        (**self).extract_lines(bucket, file_name)
    }
}

/// A recognized text region with its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// Assemble regions into lines in reading order.
///
/// Regions whose top edge falls in the same `row_height` band form one
/// line, joined left to right with single spaces. Empty regions and regions
/// below `min_confidence` are dropped.
pub fn assemble_lines(mut regions: Vec<TextRegion>, row_height: f32, min_confidence: f32) -> Vec<String> {
    let row_height = if row_height > 0.0 { row_height } else { 1.0 };
    let row_of = |r: &TextRegion| (r.y / row_height) as i64;

    let before = regions.len();
    regions.retain(|r| !r.text.trim().is_empty() && r.confidence >= min_confidence);
    if regions.len() < before {
        debug!("Dropped {} empty or low-confidence regions", before - regions.len());
    }
    regions.sort_by(|a, b| {
        row_of(a)
            .cmp(&row_of(b))
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current_row = None;
    for region in &regions {
        let row = row_of(region);
        let text = region.text.trim();
        match lines.last_mut() {
            Some(line) if current_row == Some(row) => {
                line.push(' ');
                line.push_str(text);
            }
            _ => lines.push(text.to_string()),
        }
        current_row = Some(row);
    }
    lines
}

/// Reads pre-extracted text from a `<file_name>.txt` object in the same bucket.
pub struct SidecarTextExtractor<S> {
    store: S,
}

impl<S: ObjectStore> SidecarTextExtractor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn sidecar_key(file_name: &str) -> String {
        format!("{}.txt", file_name)
    }
}

impl<S: ObjectStore> TextExtractor for SidecarTextExtractor<S> {
    fn extract_lines(&self, bucket: &str, file_name: &str) -> Result<Vec<String>, ExtractionError> {
        let key = Self::sidecar_key(file_name);
        let bytes = self.store.get(bucket, &key)?;
        let text = String::from_utf8_lossy(&bytes);

        let lines: Vec<String> = text
            .lines()
            .map(|l| l.trim_end().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        debug!("Read {} lines from sidecar {}/{}", lines.len(), bucket, key);
        Ok(lines)
    }
}
