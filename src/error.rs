//! Domain-specific error types for the synchronizer.
//!
//! Internal modules return typed errors where the variant carries meaning
//! ([`ConfigError`], [`SyncError`]); command handlers at the CLI boundary
//! convert them to [`anyhow::Error`] via the standard `?` operator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from configuration loading and path resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The user's home directory cannot be determined.
    #[error("cannot determine the user's home directory")]
    NoHome,

    /// An I/O error occurred while reading the config file.
    #[error("reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The config file contains invalid JSON.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// A `~` or `$VAR` placeholder in a configured path failed to expand.
    #[error("expanding '{value}': {source}")]
    Expand {
        /// The configured path value that failed to expand.
        value: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<std::env::VarError>,
    },
}

/// Errors that arise while computing or performing a sync pass.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A category's store directory is absent during an outgoing sync.
    #[error("cannot copy because directory {}/ does not exist", .0.display())]
    MissingCategoryDir(PathBuf),

    /// A directory could not be created.
    #[error("creating directory {}: {source}", .path.display())]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
