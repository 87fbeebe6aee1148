//! Process command - run the full pipeline on a single receipt.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use nfscan_core::{CancelToken, LocalStore, ObjectStore, PipelineOutcome};

use super::{build_pipeline, is_accepted, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Bucket (directory under the storage root)
    #[arg(required = true)]
    bucket: String,

    /// File name inside the bucket
    #[arg(required = true)]
    file: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read pre-extracted text from <file>.txt instead of running OCR
    #[arg(long)]
    text_sidecar: bool,

    /// Compute the destination without moving the file
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>, root: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path, root)?;

    if !is_accepted(&args.file) {
        anyhow::bail!("Unsupported file format: {} (expected png, jpg or jpeg)", args.file);
    }

    let store = LocalStore::new(&config.storage.root);
    if !store.exists(&args.bucket, &args.file)? {
        anyhow::bail!("File not found: {}/{}", args.bucket, args.file);
    }

    info!("Processing {}/{}", args.bucket, args.file);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Processing {}...", args.file));

    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let bucket = args.bucket.clone();
    let file = args.file.clone();
    let (text_sidecar, dry_run) = (args.text_sidecar, args.dry_run);

    let mut task = tokio::task::spawn_blocking(move || -> anyhow::Result<PipelineOutcome> {
        let pipeline = build_pipeline(&config, text_sidecar, dry_run)?;
        Ok(pipeline.process(&bucket, &file, &worker_cancel)?)
    });

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping after the current attempt");
            cancel.cancel();
            task.await
        }
    };

    let outcome = match joined? {
        Ok(outcome) => outcome,
        Err(e) => {
            pb.finish_with_message("Failed");
            return Err(e);
        }
    };
    pb.finish_with_message("Done");

    let output = serde_json::to_string_pretty(&outcome)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!("{} Output written to {}", style("✓").green(), output_path.display());
    } else {
        println!("{}", output);
    }

    let verb = if args.dry_run { "Would route" } else { "Routed" };
    eprintln!(
        "{} {} {} to {} after {} attempt(s)",
        style("ℹ").blue(),
        verb,
        outcome.file_name,
        style(&outcome.destination_key).cyan(),
        outcome.attempts
    );

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}
