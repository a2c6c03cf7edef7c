//! Error types for the license project core.
//!
//! Gated commands (adding a license without keys, saving an unnamed product)
//! are not errors; they report `CommandOutcome::Unavailable` instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading or writing a project file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path could not be read or written.
    #[error("I/O failure on {path}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but does not describe a valid project.
    #[error("corrupt project file {path}: {message}")]
    CorruptData { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        StoreError::CorruptData {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path the failing operation was working on.
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::IoFailure { path, .. } | StoreError::CorruptData { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProjectError {
    /// The entropy source or crypto provider could not produce a key pair.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Stored key material does not re-import as a matching pair.
    #[error("invalid key pair: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ProjectResult<T> = Result<T, ProjectError>;
