//! The four pipeline stages as payload-to-payload functions.
//!
//! Each stage checks the keys it needs, fails fast when one is missing and
//! carries `file_name` and `bucket_name` through unchanged.

use tracing::info;

use crate::error::{HandoffError, NfscanError, Result};
use crate::generation::{CancelToken, CandidateGenerator, RetryingGenerator};
use crate::invoice::PatternExtractor;
use crate::models::handoff::StagePayload;
use crate::models::record::RawDocument;
use crate::ocr::TextExtractor;
use crate::routing::Router;
use crate::storage::ObjectStore;

/// Extract text lines and store them, newline-joined, as `important_data`.
pub fn extract_stage<X: TextExtractor + ?Sized>(
    extractor: &X,
    mut payload: StagePayload,
) -> Result<StagePayload> {
    info!("Extracting text from {}/{}", payload.bucket_name, payload.file_name);

    let lines = extractor.extract_lines(&payload.bucket_name, &payload.file_name)?;
    let document = RawDocument::new(&payload.file_name, &payload.bucket_name, lines);
    if document.is_blank() {
        return Err(NfscanError::NoText {
            file_name: document.file_name().to_string(),
        });
    }

    info!(
        "Extracted {} lines from {}/{}",
        document.lines().len(),
        document.bucket_name(),
        document.file_name()
    );
    payload.important_data = Some(document.text());
    Ok(payload)
}

/// Replace `important_data` with the rendered pattern draft.
pub fn pattern_stage(extractor: &PatternExtractor, mut payload: StagePayload) -> Result<StagePayload> {
    info!("Drafting fields for {}", payload.file_name);

    let draft = extractor.extract_text(payload.require_important_data()?);
    payload.important_data = Some(draft.render());
    Ok(payload)
}

/// Run the generate-and-validate loop on `important_data` and store the
/// accepted record as `result_json`. Returns the attempt count alongside.
pub fn generate_stage<G: CandidateGenerator>(
    generator: &RetryingGenerator<G>,
    mut payload: StagePayload,
    cancel: &CancelToken,
) -> Result<(StagePayload, u32)> {
    info!("Generating record for {}", payload.file_name);

    let outcome = generator.run(payload.require_important_data()?, cancel)?;
    payload.important_data = None;
    payload.result_json = Some(outcome.record);
    Ok((payload, outcome.attempts))
}

/// Route the source file by the record's payment method.
///
/// The record is checked again before anything moves. With `dry_run` the
/// destination is computed but storage is not touched.
pub fn route_stage<S: ObjectStore + ?Sized>(
    router: &Router,
    store: &S,
    mut payload: StagePayload,
    dry_run: bool,
) -> Result<StagePayload> {
    let record = payload.require_result()?.revalidate().map_err(HandoffError::from)?;
    let destination = router.route(&record, &payload.file_name);
    info!(
        "Routing {} to {} (category {})",
        payload.file_name, destination.key, destination.category
    );

    if !dry_run {
        router.relocate(store, &payload.bucket_name, &payload.file_name, &destination)?;
    }
    payload.result_json = Some(record);
    payload.destination_key = Some(destination.key);
    Ok(payload)
}
