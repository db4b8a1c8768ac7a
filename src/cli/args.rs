//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Overrides for values that otherwise come from the settings file
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Output container extension (default: mov)
    #[arg(long)]
    pub ext: Option<String>,

    /// Manifest field delimiter (default: ',')
    #[arg(long)]
    pub delimiter: Option<char>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source video file
    #[arg(short, long)]
    pub source: PathBuf,

    /// Cut manifest (CSV with start_frame, end_frame, filename)
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Directory receiving the clips
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Frame rate used to convert frames to seconds
    #[arg(short, long)]
    pub fps: f64,

    /// Prefix joined to every output name with an underscore
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// External cutting program (default: ffmpeg)
    #[arg(long)]
    pub tool: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Cut manifest (CSV with start_frame, end_frame, filename)
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Directory the clips would be written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Frame rate used to convert frames to seconds
    #[arg(short, long)]
    pub fps: f64,

    /// Prefix joined to every output name with an underscore
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}
