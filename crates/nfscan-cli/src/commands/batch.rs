//! Batch processing command for every matching receipt in a bucket.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::SecondsFormat;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use nfscan_core::{CancelToken, PipelineOutcome};

use super::{build_pipeline, is_accepted, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Bucket (directory under the storage root)
    #[arg(required = true)]
    bucket: String,

    /// Glob pattern relative to the bucket
    #[arg(default_value = "*")]
    pattern: String,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Write a CSV summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Read pre-extracted text from <file>.txt instead of running OCR
    #[arg(long)]
    text_sidecar: bool,

    /// Compute destinations without moving files
    #[arg(long)]
    dry_run: bool,
}

/// Result of processing a single document.
struct BatchResult {
    file_name: String,
    outcome: Result<PipelineOutcome, String>,
    processing_time_ms: u64,
}

/// One row of the CSV summary.
#[derive(Serialize)]
struct SummaryRow<'a> {
    file_name: &'a str,
    status: &'a str,
    destination_key: &'a str,
    attempts: Option<u32>,
    issuer_name: Option<&'a str>,
    issuer_tax_id: Option<&'a str>,
    issue_date: Option<&'a str>,
    invoice_number: Option<&'a str>,
    invoice_series: Option<&'a str>,
    total_value: Option<&'a str>,
    payment_method: Option<&'a str>,
    processed_at: Option<String>,
    processing_time_ms: u64,
    error: Option<&'a str>,
}

impl<'a> From<&'a BatchResult> for SummaryRow<'a> {
    fn from(result: &'a BatchResult) -> Self {
        match &result.outcome {
            Ok(outcome) => {
                let record = &outcome.record;
                SummaryRow {
                    file_name: &result.file_name,
                    status: "success",
                    destination_key: &outcome.destination_key,
                    attempts: Some(outcome.attempts),
                    issuer_name: record.issuer_name.as_deref(),
                    issuer_tax_id: record.issuer_tax_id.as_deref(),
                    issue_date: record.issue_date.as_deref(),
                    invoice_number: record.invoice_number.as_deref(),
                    invoice_series: record.invoice_series.as_deref(),
                    total_value: record.total_value.as_deref(),
                    payment_method: record.payment_method.map(|p| p.as_str()),
                    processed_at: Some(outcome.processed_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    processing_time_ms: result.processing_time_ms,
                    error: None,
                }
            }
            Err(error) => SummaryRow {
                file_name: &result.file_name,
                status: "failed",
                destination_key: "",
                attempts: None,
                issuer_name: None,
                issuer_tax_id: None,
                issue_date: None,
                invoice_number: None,
                invoice_series: None,
                total_value: None,
                payment_method: None,
                processed_at: None,
                processing_time_ms: result.processing_time_ms,
                error: Some(error.as_str()),
            },
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>, root: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path, root)?;

    let bucket_dir = config.storage.root.join(&args.bucket);
    let files = collect_files(&bucket_dir, &args.pattern)?;
    if files.is_empty() {
        anyhow::bail!(
            "No matching files found for pattern {} in {}",
            args.pattern,
            bucket_dir.display()
        );
    }

    println!("{} Found {} files to process", style("ℹ").blue(), files.len());

    let (text_sidecar, dry_run) = (args.text_sidecar, args.dry_run);
    let build_config = config.clone();
    let pipeline = Arc::new(
        tokio::task::spawn_blocking(move || build_pipeline(&build_config, text_sidecar, dry_run)).await??,
    );

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing documents in flight");
                cancel.cancel();
            }
        });
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    let mut in_flight = stream::iter(files)
        .map(|file_name| {
            let pipeline = Arc::clone(&pipeline);
            let cancel = cancel.clone();
            let bucket = args.bucket.clone();
            async move {
                let file_start = Instant::now();
                let joined = tokio::task::spawn_blocking({
                    let file_name = file_name.clone();
                    move || pipeline.process(&bucket, &file_name, &cancel)
                })
                .await;
                let outcome = match joined {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(e) => Err(format!("worker failed: {}", e)),
                };
                BatchResult {
                    file_name,
                    outcome,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                }
            }
        })
        .buffer_unordered(args.jobs.max(1));

    while let Some(result) = in_flight.next().await {
        if let Err(e) = &result.outcome {
            warn!("Failed to process {}: {}", result.file_name, e);
        }
        pb.inc(1);
        results.push(result);
    }
    drop(in_flight);
    pb.finish_with_message("Complete");

    // the blocking HTTP client must not be dropped on an async worker
    tokio::task::spawn_blocking(move || drop(pipeline)).await?;

    results.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    let successful: Vec<&PipelineOutcome> = results.iter().filter_map(|r| r.outcome.as_ref().ok()).collect();
    let failed: Vec<&BatchResult> = results.iter().filter(|r| r.outcome.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    for (category, (count, total)) in totals_by_category(&successful) {
        println!("   {}: {} receipts, total {}", style(category).cyan(), count, total);
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(e) = &result.outcome {
                println!("  - {}: {}", result.file_name, e);
            }
        }
    }

    Ok(())
}

/// Keys of accepted image files under `bucket_dir` matching `pattern`.
fn collect_files(bucket_dir: &Path, pattern: &str) -> anyhow::Result<Vec<String>> {
    let full_pattern = bucket_dir.join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Pattern is not valid UTF-8: {}", full_pattern.display()))?;

    let mut files: Vec<String> = glob(full_pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter_map(|p| {
            let relative = p.strip_prefix(bucket_dir).ok()?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect::<Option<Vec<_>>>()?
                .join("/");
            Some(key)
        })
        .filter(|key| is_accepted(key))
        .collect();

    files.sort();
    debug!("Matched {} files", files.len());
    Ok(files)
}

/// Receipt count and summed total value per destination category.
fn totals_by_category(outcomes: &[&PipelineOutcome]) -> BTreeMap<String, (usize, Decimal)> {
    let mut totals: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
    for outcome in outcomes {
        let category = outcome
            .destination_key
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let entry = totals.entry(category).or_default();
        entry.0 += 1;
        entry.1 += outcome.record.total_amount().unwrap_or_default();
    }
    totals
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for result in results {
        wtr.serialize(SummaryRow::from(result))?;
    }
    wtr.flush()?;
    Ok(())
}
