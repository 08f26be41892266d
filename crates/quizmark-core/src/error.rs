//! Load error types.
//!
//! Grading itself never fails; these errors cover reading question banks
//! and submissions from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a bank or submission file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the expected shape.
    #[error("failed to parse TOML {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The file is not valid JSON for the expected shape.
    #[error("failed to parse JSON {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl LoadError {
    /// The path of the file that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Read { path, .. }
            | LoadError::Toml { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::UnsupportedFormat(path) => path,
        }
    }
}
