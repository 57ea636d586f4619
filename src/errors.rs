// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant is fatal for the process; recoverable conditions (a single
//! directory that cannot be watched, a failing build under the `ignore`
//! policy) are logged where they happen and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CamusError {
    #[error("failed to initialize inotify: {0}")]
    Init(#[source] std::io::Error),

    #[error("failed to walk {}: {reason}", path.display())]
    Traversal { path: PathBuf, reason: String },

    #[error("failed to read buffer: {0}")]
    Read(#[source] std::io::Error),

    #[error("command `{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CamusError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, CamusError>;
