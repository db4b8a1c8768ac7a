// TOML config adapter - Settings loaded from defaults, a TOML file and the environment

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::exec_ffmpeg::DEFAULT_TOOL;
use crate::adapters::manifest_csv::DEFAULT_DELIMITER;
use crate::domain::errors::ConfigError;
use crate::domain::rules::DEFAULT_CONTAINER_EXT;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "clipbatch.toml";

/// Environment variables and the settings keys they override
const ENV_MAPPINGS: [(&str, &str); 3] = [
    ("CLIPBATCH_TOOL", "tool"),
    ("CLIPBATCH_CONTAINER_EXT", "container_ext"),
    ("CLIPBATCH_DELIMITER", "delimiter"),
];

/// Tool-level settings shared by every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// External cutting program
    pub tool: PathBuf,
    /// Output container extension
    pub container_ext: String,
    /// Manifest field delimiter
    pub delimiter: char,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
            container_ext: DEFAULT_CONTAINER_EXT.to_string(),
            delimiter: DEFAULT_DELIMITER as char,
        }
    }
}

impl Settings {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::InvalidValue {
                key: "delimiter".to_string(),
                message: format!("'{}' is not a single ASCII character", self.delimiter),
            })
        }
    }

    /// Reject values that would make every run fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "tool".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let ext = self.container_ext.trim_start_matches('.');
        if ext.is_empty() || ext.contains(&['/', '\\'][..]) {
            return Err(ConfigError::InvalidValue {
                key: "container_ext".to_string(),
                message: format!("'{}' is not a file extension", self.container_ext),
            });
        }
        self.delimiter_byte()?;
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "tool" => self.tool = PathBuf::from(value),
            "container_ext" => self.container_ext = value.to_string(),
            "delimiter" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.delimiter = c,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: format!("'{}' must be exactly one character", value),
                        })
                    }
                }
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "unknown setting".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// On-disk layout: everything lives under a `[clipbatch]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    clipbatch: Settings,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse settings from TOML text
    pub fn parse(content: &str, path: &Path) -> Result<Settings, ConfigError> {
        let file: SettingsFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(file.clipbatch)
    }

    /// Load settings from a TOML file
    pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Override settings from environment-style lookups
    pub fn apply_env<F>(mut settings: Settings, lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (env_var, key) in ENV_MAPPINGS {
            if let Some(value) = lookup(env_var) {
                debug!("Found environment override: {} = {}", env_var, value);
                settings.set(key, &value)?;
            }
        }
        Ok(settings)
    }

    /// Resolve settings following precedence: Env > File > Defaults.
    ///
    /// An explicit `config_path` must exist; otherwise `clipbatch.toml` in the
    /// working directory is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
        let settings = match config_path {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::load_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                Self::load_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Settings::default()
            }
        };

        let settings = Self::apply_env(settings, |key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }
}
