//! Error taxonomy of an analysis run.
//!
//! Only [`AnalysisError::NoUsableInput`] and [`AnalysisError::ThreadPool`]
//! abort a run. Every other variant is local to one file and ends up recorded
//! as an error-severity issue.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::source::LineRange;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file could not be read at the I/O level.
    #[error("cannot read {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exceeds the configured read limit.
    #[error("{} is {size} bytes, above the {limit} byte limit", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The content is not a configuration this tool can interpret.
    #[error("malformed configuration in {}{}: {reason}", .path.display(), fmt_lines(.lines))]
    MalformedConfig {
        path: PathBuf,
        lines: Option<LineRange>,
        reason: String,
    },

    /// A second file declares a hostname that is already taken in this run.
    #[error("duplicate hostname '{hostname}' in {} (already declared by {})", .path.display(), .first.display())]
    DuplicateHostname {
        hostname: String,
        path: PathBuf,
        first: PathBuf,
    },

    /// Nothing in the input set could be turned into a device.
    #[error("no usable configuration files ({attempted} attempted)")]
    NoUsableInput { attempted: usize },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl AnalysisError {
    pub fn malformed(path: impl Into<PathBuf>, lines: Option<LineRange>, reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            path: path.into(),
            lines,
            reason: reason.into(),
        }
    }

    /// Rule identifier used when the error is recorded as an issue.
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::FileUnreadable { .. } | Self::FileTooLarge { .. } => "file-unreadable",
            Self::MalformedConfig { .. } => "malformed-config",
            Self::DuplicateHostname { .. } => "duplicate-hostname",
            Self::NoUsableInput { .. } => "no-usable-input",
            Self::ThreadPool(_) => "thread-pool",
        }
    }

    /// Line range of the offending block, when one is known.
    pub fn lines(&self) -> Option<LineRange> {
        match self {
            Self::MalformedConfig { lines, .. } => *lines,
            _ => None,
        }
    }
}

fn fmt_lines(lines: &Option<LineRange>) -> String {
    match lines {
        Some(range) => format!(" (lines {range})"),
        None => String::new(),
    }
}

/// Internal failure of a single validation rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid prefix length /{prefix} on {interface}")]
    InvalidPrefix { interface: String, prefix: u8 },

    #[error("rule panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}
