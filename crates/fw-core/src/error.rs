//! Unified error type for ffwrap.
//!
//! Every crate in the workspace funnels its failures into [`Error`]. Failures
//! caused by the external tool itself carry the rendered command line and the
//! tool's own last diagnostic message so callers see what ffmpeg said.

use std::path::PathBuf;
use std::time::Duration;

/// Unified error type covering all failure modes in ffwrap.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source media file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The tool exited non-zero while probing.
    #[error("Probe failed ({command}): {message}")]
    ProbeFailed {
        /// Rendered command line that was run.
        command: String,
        /// Tail of the tool's last diagnostic line.
        message: String,
    },

    /// The tool exited non-zero while transcoding.
    #[error("Transcode failed ({command}): {message}")]
    TranscodeFailed {
        /// Rendered command line that was run.
        command: String,
        /// Tail of the tool's last diagnostic line.
        message: String,
    },

    /// The probe succeeded but the input lacks what the operation needs.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// The caller cancelled the operation; the child process was killed.
    #[error("Cancelled: {command}")]
    Cancelled {
        /// Rendered command line that was running.
        command: String,
    },

    /// The tool ran past its deadline and was killed.
    #[error("Timed out after {timeout:?}: {command}")]
    TimedOut {
        /// Rendered command line that was running.
        command: String,
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// An external tool could not be located, spawned, or failed outside
    /// the probe/transcode protocol.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Arguments or configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::FileNotFound`].
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Convenience constructor for [`Error::ProbeFailed`].
    pub fn probe_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ProbeFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::TranscodeFailed`].
    pub fn transcode_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::TranscodeFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether this error reflects the external tool's own non-zero exit.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, Error::ProbeFailed { .. } | Error::TranscodeFailed { .. })
    }

    /// The command line attached to this error, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            Error::ProbeFailed { command, .. }
            | Error::TranscodeFailed { command, .. }
            | Error::Cancelled { command }
            | Error::TimedOut { command, .. } => Some(command),
            _ => None,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
