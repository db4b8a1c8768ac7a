//! CLI module for ClipBatch
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// ClipBatch
///
/// Cuts many clips out of one source video, driven by a CSV manifest of frame
/// ranges. Every clip is a stream copy performed by an external tool.
#[derive(Parser, Debug)]
#[command(name = "clipbatch")]
#[command(about = "ClipBatch - Cut a video into clips from a frame-range manifest")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Settings file (TOML)
    #[arg(long, env = "CLIPBATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut every clip listed in a manifest
    Run(args::RunArgs),
    /// Validate a manifest and show the planned cuts without running the tool
    Check(args::CheckArgs),
}
