//! Service configuration loaded from a JSON file.
//!
//! # Responsibility
//! - Parse the process configuration the outer HTTP shell boots with.
//! - Keep defaults for optional observability settings in one place.
//!
//! # Invariants
//! - Missing `port` or `db_file` is a parse error, not a silent default.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// TCP port the outer HTTP shell listens on.
    pub port: u16,
    /// SQLite database file path.
    pub db_file: PathBuf,
    /// Log directory; file logging is skipped when absent.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Log level; build-mode default applies when absent.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Loads configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|err| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source: err,
        })?;
        let config = serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: err,
        })?;
        Ok(config)
    }

    /// Effective log level: configured value or the build-mode default.
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
