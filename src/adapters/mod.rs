// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod manifest_csv;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::FsLocalAdapter;
pub use manifest_csv::CsvManifestAdapter;
pub use toml_config::{Settings, TomlConfigAdapter};
pub use tracing_log::TracingProgressAdapter;
