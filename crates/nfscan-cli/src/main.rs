//! CLI application for invoice receipt extraction and routing.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process, stage};

/// nfscan - Extract validated records from invoice receipts and route them by payment method
#[derive(Parser)]
#[command(name = "nfscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Storage root containing bucket directories (overrides config)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single receipt end to end
    Process(process::ProcessArgs),

    /// Process every matching receipt in a bucket
    Batch(batch::BatchArgs),

    /// Run one pipeline stage on a handoff payload
    Stage(stage::StageArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries records and payloads
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    let root = cli.root.as_deref();

    match cli.command {
        Commands::Process(args) => process::run(args, config_path, root).await,
        Commands::Batch(args) => batch::run(args, config_path, root).await,
        Commands::Stage(args) => stage::run(args, config_path, root).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
