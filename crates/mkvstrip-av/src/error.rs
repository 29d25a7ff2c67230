//! Error types for mkvstrip-av.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while identifying, remuxing or committing a file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool could not be spawned or waited on.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// The input directory could not be read.
    #[error("cannot list {}: {source}", path.display())]
    ListingFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Identification failed or produced output that cannot be decoded.
    #[error("[{file}] identification failed: {message}")]
    ParseFailure { file: String, message: String },

    /// The remux tool reported a failure.
    #[error("[{file}] remux failed{}: {message}", exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    RemuxFailure {
        file: String,
        exit_code: Option<i32>,
        message: String,
    },

    /// Promoting the remuxed output over the original failed.
    #[error("[{file}] commit failed: {message}")]
    CommitFailure { file: String, message: String },

    /// An external tool did not exit within the configured bound.
    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },

    /// A language code is not three ASCII letters.
    #[error("invalid language code: {0:?} (expected three letters, e.g. \"eng\")")]
    InvalidLanguage(String),

    /// A path that cannot be handed to the tools without being altered.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`], used in batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ToolNotFound,
    Listing,
    Parse,
    Remux,
    Commit,
    Timeout,
    InvalidInput,
    Io,
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a parse failure attributed to `file`.
    pub fn parse_failure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a remux failure attributed to `file`.
    pub fn remux_failure(
        file: impl Into<String>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemuxFailure {
            file: file.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create a commit failure attributed to `file`.
    pub fn commit_failure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommitFailure {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Classify this error for reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::ToolNotFound { .. } => FailureKind::ToolNotFound,
            Error::ToolFailed { .. } | Error::Io(_) => FailureKind::Io,
            Error::ListingFailure { .. } => FailureKind::Listing,
            Error::ParseFailure { .. } | Error::Json(_) => FailureKind::Parse,
            Error::RemuxFailure { .. } => FailureKind::Remux,
            Error::CommitFailure { .. } => FailureKind::Commit,
            Error::Timeout { .. } => FailureKind::Timeout,
            Error::InvalidLanguage(_) | Error::NonUtf8Path { .. } => FailureKind::InvalidInput,
        }
    }
}
