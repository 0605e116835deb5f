//! Service configuration.
//!
//! Container names and log behavior are injected at startup (flags or
//! environment in the CLI); nothing here is compiled in except defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONTAINER: &str = "pictures";
pub const DEFAULT_LOG_CONTAINER: &str = "logs";

/// How a record is written to the daily log blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Replace the whole blob with the latest record.
    #[default]
    Overwrite,
    /// Read, append, write back.
    Append,
}

#[derive(Debug, Error)]
#[error("unknown log mode '{0}' (expected 'overwrite' or 'append')")]
pub struct ParseLogModeError(String);

impl FromStr for LogMode {
    type Err = ParseLogModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(LogMode::Overwrite),
            "append" => Ok(LogMode::Append),
            _ => Err(ParseLogModeError(s.to_string())),
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMode::Overwrite => f.write_str("overwrite"),
            LogMode::Append => f.write_str("append"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Container holding data blobs.
    pub container: String,
    /// Container holding `log_YYYYMMDD.txt` blobs.
    pub log_container: String,
    pub log_mode: LogMode,
    /// Allow download to replace an existing local file.
    pub overwrite_downloads: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            log_container: DEFAULT_LOG_CONTAINER.to_string(),
            log_mode: LogMode::default(),
            overwrite_downloads: false,
        }
    }
}
