//! Stage command - run one pipeline stage on a JSON handoff payload.
//!
//! Reads the payload from `--input` or stdin and prints the payload the stage
//! emits, so an external orchestrator can chain the stages.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use nfscan_core::invoice::PatternExtractor;
use nfscan_core::pipeline::{extract_stage, generate_stage, pattern_stage, route_stage};
use nfscan_core::{CancelToken, LocalStore, Router, StagePayload};

use super::{build_extractor, build_generator, load_config};

/// Arguments for the stage command.
#[derive(Args)]
pub struct StageArgs {
    /// Stage to run
    #[arg(value_enum)]
    stage: StageName,

    /// Payload file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Read pre-extracted text from <file>.txt instead of running OCR (extract)
    #[arg(long)]
    text_sidecar: bool,

    /// Compute the destination without moving the file (route)
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StageName {
    /// Text lines into important_data
    Extract,
    /// important_data into the rendered pattern draft
    Pattern,
    /// important_data into a validated result_json
    Generate,
    /// Relocate the source file by result_json
    Route,
}

pub async fn run(args: StageArgs, config_path: Option<&str>, root: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path, root)?;

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let payload = StagePayload::from_json(&raw)?;

    info!("Running {:?} stage for {}", args.stage, payload.file_name);

    let payload = match args.stage {
        StageName::Extract => {
            let extractor = build_extractor(&config, args.text_sidecar)?;
            extract_stage(extractor.as_ref(), payload)?
        }
        StageName::Pattern => pattern_stage(&PatternExtractor::new(), payload)?,
        StageName::Generate => {
            tokio::task::spawn_blocking(move || -> anyhow::Result<StagePayload> {
                let generator = build_generator(&config)?;
                let (payload, attempts) = generate_stage(&generator, payload, &CancelToken::new())?;
                info!("Record accepted after {} attempt(s)", attempts);
                Ok(payload)
            })
            .await??
        }
        StageName::Route => {
            let router = Router::new(config.routing.clone());
            let store = LocalStore::new(&config.storage.root);
            route_stage(&router, &store, payload, args.dry_run)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
