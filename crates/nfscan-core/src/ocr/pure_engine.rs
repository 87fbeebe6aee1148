//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::sync::Mutex;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::OcrConfig;
use crate::storage::ObjectStore;

use super::{assemble_lines, TextExtractor, TextRegion};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    keep_unk: bool,
    row_height: f32,
    recognition_threshold: f32,
}

impl PureOcrEngine {
    /// Load the detection, recognition and dictionary files named in `config`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, ExtractionError> {
        let det_path = config.detection_path();
        let rec_path = config.recognition_path();
        let dict_path = config.dictionary_path();

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| ExtractionError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            keep_unk: config.keep_unk,
            row_height: config.row_height,
            recognition_threshold: config.recognition_threshold,
        })
    }

    /// Recognize text regions in an image.
    pub fn recognize(&self, image: &DynamicImage) -> Result<Vec<TextRegion>, ExtractionError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        debug!("Processing image: {}x{}", width, height);

        let results = {
            let engine = self
                .engine
                .lock()
                .map_err(|_| ExtractionError::Recognition("OCR engine lock poisoned".to_string()))?;
            engine
                .run_from_image(image)
                .map_err(|e| ExtractionError::Recognition(format!("pure-onnx-ocr: {}", e)))?
        };

        let regions: Vec<TextRegion> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextRegion {
                    text,
                    x,
                    y,
                    confidence: r.confidence,
                }
            })
            .collect();

        info!(
            "OCR complete: {} text regions in {}ms",
            regions.len(),
            start.elapsed().as_millis()
        );
        Ok(regions)
    }

    /// Recognize an image and assemble its text lines.
    pub fn extract_lines(&self, image: &DynamicImage) -> Result<Vec<String>, ExtractionError> {
        Ok(assemble_lines(self.recognize(image)?, self.row_height, self.recognition_threshold))
    }
}

/// Minimum x and y over the first four exterior points of a region polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

/// Reads an image object from storage and runs OCR on it.
pub struct OcrTextExtractor<S> {
    engine: PureOcrEngine,
    store: S,
}

impl<S: ObjectStore> OcrTextExtractor<S> {
    pub fn new(engine: PureOcrEngine, store: S) -> Self {
        Self { engine, store }
    }
}

impl<S: ObjectStore> TextExtractor for OcrTextExtractor<S> {
    fn extract_lines(&self, bucket: &str, file_name: &str) -> Result<Vec<String>, ExtractionError> {
        let bytes = self.store.get(bucket, file_name)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| ExtractionError::InvalidImage(format!("{}: {}", file_name, e)))?;
        self.engine.extract_lines(&image)
    }
}
