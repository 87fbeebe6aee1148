//! In-process sequential pipeline.

mod stages;

pub use stages::{extract_stage, generate_stage, pattern_stage, route_stage};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::{GenerationError, Result};
use crate::generation::{CancelToken, CandidateGenerator, RetryingGenerator};
use crate::invoice::PatternExtractor;
use crate::models::handoff::StagePayload;
use crate::models::record::ValidatedRecord;
use crate::ocr::TextExtractor;
use crate::routing::Router;
use crate::storage::ObjectStore;

/// Result of running every stage on one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutcome {
    pub file_name: String,
    pub bucket_name: String,
    pub record: ValidatedRecord,
    pub destination_key: String,
    pub attempts: u32,
    pub processed_at: DateTime<Utc>,
}

/// Runs extract, pattern, generate and route on one document at a time.
pub struct Pipeline<X, G, S> {
    extractor: X,
    patterns: PatternExtractor,
    generator: RetryingGenerator<G>,
    router: Router,
    store: S,
    dry_run: bool,
}

impl<X, G, S> Pipeline<X, G, S>
where
    X: TextExtractor,
    G: CandidateGenerator,
    S: ObjectStore,
{
    pub fn new(extractor: X, generator: RetryingGenerator<G>, router: Router, store: S) -> Self {
        Self {
            extractor,
            patterns: PatternExtractor::new(),
            generator,
            router,
            store,
            dry_run: false,
        }
    }

    /// Compute destinations without moving files.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process one document end to end.
    pub fn process(&self, bucket: &str, file_name: &str, cancel: &CancelToken) -> Result<PipelineOutcome> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled { attempts: 0 }.into());
        }
        info!("Processing {}/{}", bucket, file_name);

        let payload = StagePayload::new(file_name, bucket);
        let payload = extract_stage(&self.extractor, payload)?;
        let payload = pattern_stage(&self.patterns, payload)?;
        let (payload, attempts) = generate_stage(&self.generator, payload, cancel)?;
        let payload = route_stage(&self.router, &self.store, payload, self.dry_run)?;

        let record = payload.require_result()?.clone();
        let destination_key = payload.destination_key.unwrap_or_default();

        info!(
            "Finished {}/{}: {} fields, {} attempts, {}",
            bucket,
            file_name,
            record.present_fields(),
            attempts,
            destination_key
        );

        Ok(PipelineOutcome {
            file_name: payload.file_name,
            bucket_name: payload.bucket_name,
            record,
            destination_key,
            attempts,
            processed_at: Utc::now(),
        })
    }
}
