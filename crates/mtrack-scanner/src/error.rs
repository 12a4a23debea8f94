//! Error types for camera acquisition

/// Camera acquisition errors
///
/// Only raised by `start`; stopping a capture never fails.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// The platform refused camera access
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// No usable capture device
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Decoder process could not be launched
    #[error("failed to launch decoder '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Decoder process quit while the camera was being acquired
    #[error("decoder exited during startup ({status}): {stderr}")]
    ExitedEarly { status: String, stderr: String },
}

impl ScannerError {
    /// Create spawn error for program
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(source.to_string()),
            _ => Self::Spawn {
                program: program.into(),
                source,
            },
        }
    }

    /// Check if the user can fix this by granting access
    #[inline]
    #[must_use]
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_maps_permission_errors() {
        let err = ScannerError::spawn(
            "zbarcam",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_permission());

        let err = ScannerError::spawn(
            "zbarcam",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(!err.is_permission());
        assert!(err.to_string().contains("zbarcam"));
    }
}
