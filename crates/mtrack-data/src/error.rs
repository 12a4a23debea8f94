//! Error types for the data layer

use mtrack_model::MachineId;
use std::path::PathBuf;

/// Data layer errors
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Complaint references a machine the catalog does not hold
    #[error("unknown machine: {0}")]
    UnknownMachine(MachineId),

    /// Complaint draft rejected by validation
    #[error("invalid complaint: {0}")]
    InvalidComplaint(String),

    /// Backing store cannot be reached
    #[error("data layer unavailable: {0}")]
    Unavailable(String),

    /// IO error reading a catalog file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid JSON
    #[error("invalid machine catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_display() {
        let err = DataError::UnknownMachine(MachineId::new("m9"));
        assert_eq!(err.to_string(), "unknown machine: m9");

        let err = DataError::io_error(
            "/tmp/machines.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/machines.json"));
    }
}
