//! Dispatcher configuration persistence
//!
//! Stores preferences in `~/.config/multicaret/config.yaml`

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::editable::DEFAULT_PAGE_LINES;

/// Undo transaction name used when none is configured
pub const DEFAULT_TRANSACTION_NAME: &str = "Multi-caret edit";

/// Error loading or saving a configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    Io(PathBuf, std::io::Error),
    /// The file is not valid YAML for [`MultiCaretConfig`]
    Parse(PathBuf, serde_yaml::Error),
    Serialize(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "I/O error on {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse config at {}: {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) | ConfigError::Serialize(e) => Some(e),
        }
    }
}

/// Configuration for the dispatcher and the reference host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiCaretConfig {
    /// Name of the undo transaction wrapping each fan-out
    #[serde(default = "default_transaction_name")]
    pub transaction_name: String,

    /// Commands rejected in addition to the built-in denylist
    /// (e.g. `"InsertTab"`, `"Host:7:42"`)
    #[serde(default)]
    pub denied_commands: Vec<String>,

    /// Lines moved by PageUp/PageDown in the reference host
    #[serde(default = "default_page_lines")]
    pub page_lines: usize,
}

fn default_transaction_name() -> String {
    DEFAULT_TRANSACTION_NAME.to_string()
}

fn default_page_lines() -> usize {
    DEFAULT_PAGE_LINES
}

impl Default for MultiCaretConfig {
    fn default() -> Self {
        Self {
            transaction_name: default_transaction_name(),
            denied_commands: Vec::new(),
            page_lines: default_page_lines(),
        }
    }
}

impl MultiCaretConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            crate::config_paths::ensure_dir(parent)
                .map_err(|e| ConfigError::Io(parent.to_path_buf(), e))?;
        }

        let content = serde_yaml::to_string(self).map_err(ConfigError::Serialize)?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Parsed `denied_commands`; entries that don't name a command are skipped
    pub fn denylist(&self) -> Vec<Command> {
        self.denied_commands
            .iter()
            .filter_map(|name| match name.parse::<Command>() {
                Ok(command) => Some(command),
                Err(e) => {
                    tracing::warn!("Ignoring denied command: {}", e);
                    None
                }
            })
            .collect()
    }
}
