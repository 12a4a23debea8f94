//! View configuration
//!
//! Everything is optional in the TOML file; missing keys fall back to the
//! defaults below.
//!
//! ```toml
//! [messages]
//! camera_error = "Camera blocked. Allow access and retry."
//!
//! [scanner]
//! device = "/dev/video2"
//!
//! [scanner.decoder]
//! program = "zbarcam"
//! args = ["--raw", "--nodisplay", "{device}"]
//! ```

use crate::error::ViewError;
use mtrack_scanner::{DecoderCommand, ScanOptions, VideoSurface};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scan view configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// User-facing text
    pub messages: Messages,
    /// Camera and decoder
    pub scanner: ScannerConfig,
}

impl ViewConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With capture device
    #[inline]
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.scanner.device = device.into();
        self
    }

    /// With decoder command
    #[inline]
    #[must_use]
    pub fn with_decoder(mut self, decoder: DecoderCommand) -> Self {
        self.scanner.decoder = decoder;
        self
    }

    /// With messages
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// - `ViewError::Toml` on malformed input
    pub fn from_toml_str(raw: &str) -> Result<Self, ViewError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load TOML from disk
    ///
    /// # Errors
    /// - `ViewError::Io` if the file cannot be read
    /// - `ViewError::Toml` on malformed input
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ViewError::io_error(path, e))?;
        Self::from_toml_str(&raw)
    }
}

/// User-facing text shown by the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Page heading
    pub title: String,
    /// Camera acquisition failure
    pub camera_error: String,
    /// Complaint submission failure
    pub complaint_error: String,
    /// Complaint accepted
    pub complaint_success: String,
    /// Shown while no machine is resolved
    pub no_machine_hint: String,
    /// Shown in the camera panel while not scanning
    pub camera_idle_hint: String,
    /// Manual entry field placeholder
    pub manual_entry_hint: String,
    /// Complaint text field placeholder
    pub complaint_hint: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            title: "Scan Machine QR".to_string(),
            camera_error: "Failed to start camera. Please check camera permissions.".to_string(),
            complaint_error: "Failed to raise complaint.".to_string(),
            complaint_success: "Complaint raised successfully!".to_string(),
            no_machine_hint: "Scan a machine QR code or enter its ID to view details."
                .to_string(),
            camera_idle_hint: "Camera preview will appear here".to_string(),
            manual_entry_hint: "Or enter machine QR/ID manually".to_string(),
            complaint_hint: "Describe the issue...".to_string(),
        }
    }
}

/// Camera and decoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Capture device
    pub device: String,
    /// Decoder process
    pub decoder: DecoderCommand,
    /// Overlay and buffering
    pub options: ScanOptions,
}

impl ScannerConfig {
    /// Capture surface for the configured device
    #[inline]
    #[must_use]
    pub fn surface(&self) -> VideoSurface {
        VideoSurface::new(self.device.clone())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            device: VideoSurface::default().device().to_string(),
            decoder: DecoderCommand::default(),
            options: ScanOptions::default(),
        }
    }
}
