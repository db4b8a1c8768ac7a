//! ClipBatch
//!
//! Cuts many clips out of one source video according to a CSV manifest of
//! frame ranges, using ffmpeg stream copy for every clip.
//!
//! # Usage
//!
//! ```bash
//! clipbatch run --source match.mp4 --manifest cuts.csv --output-dir clips --fps 29.97 --prefix take1
//! clipbatch check --manifest cuts.csv --fps 29.97
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipbatch::adapters::tracing_log::init_logging;
use clipbatch::cli::{commands, Cli, Commands};

/// Main entry point for the ClipBatch application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level, cli.log_json);

    let config_path = cli.config.as_deref();

    // Execute the requested command
    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            commands::run(args, config_path).await?;
        }
        Commands::Check(args) => {
            info!("Executing check command");
            commands::check(args, config_path).await?;
        }
    }

    Ok(())
}
