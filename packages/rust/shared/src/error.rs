//! Error types for the SEO writer.
//!
//! Library crates use [`SeoWriterError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for its own plumbing and classifies
//! pipeline failures with [`SeoWriterError::kind`].

use std::path::PathBuf;

/// Top-level error type for all pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum SeoWriterError {
    /// Configuration loading or validation error (including missing credentials).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to a search or AI backend.
    #[error("network error: {0}")]
    Network(String),

    /// AI backend failure, carrying the backend's own message as context.
    #[error("{backend} API error: {message}")]
    Provider { backend: String, message: String },

    /// Response parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Bad user input. The message names the violated rule.
    #[error("{message}")]
    Validation { message: String },
}

/// The two failure kinds surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input; the run aborts with the specific violated rule.
    Validation,
    /// Everything else: credentials, backends, filesystem.
    System,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SeoWriterError>;

impl SeoWriterError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a backend failure with the backend's name for context.
    pub fn provider(backend: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            backend: backend.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error into one of the user-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            _ => ErrorKind::System,
        }
    }
}
