//! Error types for the scan view
//!
//! Runtime failures (camera, complaint submission) never surface here: they are
//! caught and turned into view state. Only configuration loading can fail.

use std::path::PathBuf;

/// View configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this view
    #[error("invalid view config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ViewError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
