//! Operation log records and the daily log blob naming rule.
//!
//! A record is rendered as one text line. Records of the same UTC day land
//! in the same log blob (`log_YYYYMMDD.txt`).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a logged operation.
///
/// Serialized as SCREAMING_SNAKE_CASE: SUCCESS / ERROR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogOutcome {
    Success,
    Error,
}

impl fmt::Display for LogOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOutcome::Success => f.write_str("SUCCESS"),
            LogOutcome::Error => f.write_str("ERROR"),
        }
    }
}

/// Operations that leave a record in the log container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    UploadBlob,
    DownloadBlob,
    DeleteBlob,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UploadBlob => "UploadBlob",
            Action::DownloadBlob => "DownloadBlob",
            Action::DeleteBlob => "DeleteBlob",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed operation, as written to the log blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub outcome: LogOutcome,
    pub action: Action,
    pub container: String,
    pub blob: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn success(
        action: Action,
        container: impl Into<String>,
        blob: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            outcome: LogOutcome::Success,
            action,
            container: container.into(),
            blob: blob.into(),
            error: None,
            timestamp,
        }
    }

    pub fn error(
        action: Action,
        container: impl Into<String>,
        blob: impl Into<String>,
        error: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            outcome: LogOutcome::Error,
            action,
            container: container.into(),
            blob: blob.into(),
            error: Some(error.into()),
            timestamp,
        }
    }

    /// The record as a single `\n`-terminated line.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Action: {}, Container: {}, Blob: {}",
            self.outcome,
            self.action,
            OneLine(&self.container),
            OneLine(&self.blob)
        )?;
        if let Some(error) = &self.error {
            write!(f, ", Error: {}", OneLine(error))?;
        }
        write!(
            f,
            ", Timestamp: {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}

/// Writes `\r` and `\n` as their escaped two-character forms so a field
/// can never break a record across lines.
struct OneLine<'a>(&'a str);

impl fmt::Display for OneLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(i) = rest.find(['\r', '\n']) {
            f.write_str(&rest[..i])?;
            f.write_str(if rest.as_bytes()[i] == b'\r' { "\\r" } else { "\\n" })?;
            rest = &rest[i + 1..];
        }
        f.write_str(rest)
    }
}

/// Name of the log blob holding records for `date`.
pub fn log_blob_name(date: NaiveDate) -> String {
    format!("log_{}.txt", date.format("%Y%m%d"))
}
