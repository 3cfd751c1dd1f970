//! Error types for `Tessera`
//!
//! Pane-tree specific errors live in [`crate::pane`]; this module holds the
//! errors of the surrounding crate plumbing.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::pane::{PaneError, WorkspaceError};

/// Errors that can occur while loading or saving layout settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// The settings could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// No platform config directory could be determined.
    #[error("Could not determine the config directory")]
    NoConfigDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
