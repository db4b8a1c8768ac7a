// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

/// Manifest parsing failures. Any of these aborts the whole parse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// A required header is absent
    #[error("Manifest is missing required column '{column}'")]
    MissingColumn { column: String },

    /// A frame cell could not be read as a number
    #[error("Manifest row {row}: column '{column}' expects a number, found '{value}'")]
    TypeMismatch {
        row: usize,
        column: String,
        value: String,
    },

    /// No header or no data rows
    #[error("Manifest contains no cut rows")]
    Empty,

    /// The delimited data itself is broken (ragged rows, bad UTF-8)
    #[error("Manifest is malformed: {message}")]
    Malformed { message: String },
}

/// Output path preparation failures. Fatal to one job only.
#[derive(Error, Debug)]
pub enum PathError {
    /// Ancestor directories of the output path could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file left at the output path by an earlier run could not be removed
    #[error("Failed to remove existing output {}: {source}", .path.display())]
    StaleOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a run before any job is attempted
#[derive(Error, Debug)]
pub enum RunError {
    /// Source, output directory or frame rate failed validation
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The manifest could not be parsed
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Settings loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the settings schema
    #[error("Failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A value is present but unusable
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
