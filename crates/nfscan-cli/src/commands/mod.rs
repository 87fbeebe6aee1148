//! Subcommands and the collaborator wiring they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod stage;

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use nfscan_core::models::config::NfscanConfig;
use nfscan_core::{
    ChatGenerator, LocalStore, OcrTextExtractor, Pipeline, PureOcrEngine, RetryingGenerator,
    Router, SidecarTextExtractor, TextExtractor,
};

/// Image extensions accepted for processing.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub type CliPipeline = Pipeline<Box<dyn TextExtractor>, ChatGenerator, LocalStore>;

/// Load the given config file, else the user config file if present, else
/// defaults. `root` overrides the storage root.
pub fn load_config(config_path: Option<&str>, root: Option<&Path>) -> anyhow::Result<NfscanConfig> {
    let mut config = match config_path {
        Some(path) => NfscanConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to read config file {}", path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                NfscanConfig::from_file(&default_path)
                    .with_context(|| format!("Failed to read config file {}", default_path.display()))?
            } else {
                NfscanConfig::default()
            }
        }
    };

    if let Some(root) = root {
        config.storage.root = root.to_path_buf();
    }
    Ok(config)
}

pub fn is_accepted(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ACCEPTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// OCR extractor, or the sidecar extractor when `text_sidecar` is set.
pub fn build_extractor(config: &NfscanConfig, text_sidecar: bool) -> anyhow::Result<Box<dyn TextExtractor>> {
    let store = LocalStore::new(&config.storage.root);

    if text_sidecar {
        debug!("Reading text from .txt sidecars");
        return Ok(Box::new(SidecarTextExtractor::new(store)));
    }

    let det_model = config.ocr.detection_path();
    let rec_model = config.ocr.recognition_path();
    if !det_model.exists() || !rec_model.exists() {
        anyhow::bail!(
            "OCR models not found in {}.\n\n\
             Place {} and {} there, or use --text-sidecar.",
            config.ocr.model_dir.display(),
            config.ocr.detection_model,
            config.ocr.recognition_model
        );
    }

    let engine = PureOcrEngine::from_config(&config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))?;
    Ok(Box::new(OcrTextExtractor::new(engine, store)))
}

/// Chat generator wrapped in the configured retry policy.
///
/// Must be built, used and dropped on a blocking thread.
pub fn build_generator(config: &NfscanConfig) -> anyhow::Result<RetryingGenerator<ChatGenerator>> {
    let chat = ChatGenerator::from_config(&config.generation)?;
    Ok(RetryingGenerator::new(chat, config.retry.policy()).with_validator(config.validation.validator()))
}

pub fn build_pipeline(config: &NfscanConfig, text_sidecar: bool, dry_run: bool) -> anyhow::Result<CliPipeline> {
    Ok(Pipeline::new(
        build_extractor(config, text_sidecar)?,
        build_generator(config)?,
        Router::new(config.routing.clone()),
        LocalStore::new(&config.storage.root),
    )
    .with_dry_run(dry_run))
}
