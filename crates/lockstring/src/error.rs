//! # Demo Error Types

use std::path::PathBuf;

use lockstring_core::SyncStringError;
use thiserror::Error;

/// Errors that can stop a demo run.
#[derive(Error, Debug)]
pub enum DemoError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DemoConfig`](crate::DemoConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config parsed but its values cannot drive a run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A string operation failed inside a worker.
    #[error(transparent)]
    Container(#[from] SyncStringError),

    /// A worker thread panicked.
    #[error("{role} thread {index} panicked")]
    WorkerPanicked {
        /// "writer" or "reader".
        role: &'static str,
        /// Index of the thread within its role.
        index: usize,
    },
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;
