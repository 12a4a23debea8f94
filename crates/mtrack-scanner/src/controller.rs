//! Scanner lifecycle controller
//!
//! Acquire on `start`, release on `stop`, on a successful decode, or when the
//! controller is dropped. At most one capture is held at a time and each
//! capture is released exactly once.

use crate::capture::{Capture, ScanOptions, ScanSource, VideoSurface};
use crate::error::ScannerError;
use std::sync::Arc;

/// Start/stop lifecycle around a [`ScanSource`]
pub struct ScannerController {
    source: Arc<dyn ScanSource>,
    surface: VideoSurface,
    options: ScanOptions,
    active: Option<Capture>,
}

impl ScannerController {
    /// Create controller; nothing is acquired until [`start`](Self::start)
    #[must_use]
    pub fn new(source: Arc<dyn ScanSource>, surface: VideoSurface, options: ScanOptions) -> Self {
        Self {
            source,
            surface,
            options,
            active: None,
        }
    }

    /// Whether a capture is held
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Capture surface
    #[inline]
    #[must_use]
    pub fn surface(&self) -> &VideoSurface {
        &self.surface
    }

    /// Acquire the camera and start decoding
    ///
    /// Starting while already active keeps the current capture.
    ///
    /// # Errors
    /// Acquisition failure from the source; the controller stays inactive.
    pub async fn start(&mut self) -> Result<(), ScannerError> {
        if self.is_active() {
            return Ok(());
        }

        match self.source.open(&self.surface, &self.options).await {
            Ok(capture) => {
                tracing::info!(surface = %self.surface, "Scanning started");
                self.active = Some(capture);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(surface = %self.surface, error = %e, "Camera acquisition failed");
                Err(e)
            }
        }
    }

    /// Wait for the next decode, then stop
    ///
    /// Returns `None` when inactive or when the decoder stream ends; either
    /// way the controller is inactive afterwards.
    pub async fn next_code(&mut self) -> Option<String> {
        let capture = self.active.as_mut()?;
        let code = capture.recv().await;
        match &code {
            Some(code) => tracing::info!(code = %code, "QR code decoded"),
            None => tracing::debug!(surface = %self.surface, "Decoder stream ended"),
        }
        self.stop();
        code
    }

    /// Release the camera
    ///
    /// Returns `true` if a capture was released, `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(capture) => {
                capture.release();
                tracing::info!(surface = %self.surface, "Scanning stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for ScannerController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ScannerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScannerController")
            .field("surface", &self.surface)
            .field("options", &self.options)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedScanSource;

    fn controller(source: &ScriptedScanSource) -> ScannerController {
        ScannerController::new(
            Arc::new(source.clone()),
            VideoSurface::default(),
            ScanOptions::default(),
        )
    }

    #[tokio::test]
    async fn decode_stops_capture() {
        let source = ScriptedScanSource::new().then_decode(["QR1"]);
        let mut scanner = controller(&source);

        scanner.start().await.unwrap();
        assert!(scanner.is_active());

        assert_eq!(scanner.next_code().await.as_deref(), Some("QR1"));
        assert!(!scanner.is_active());
        assert_eq!(source.counters().releases(), 1);
    }

    #[tokio::test]
    async fn failed_start_leaves_inactive() {
        let source = ScriptedScanSource::new().then_deny();
        let mut scanner = controller(&source);

        let err = scanner.start().await.unwrap_err();
        assert!(err.is_permission());
        assert!(!scanner.is_active());
        assert_eq!(source.counters().opens(), 0);
        assert_eq!(scanner.next_code().await, None);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let source = ScriptedScanSource::new().then_idle();
        let mut scanner = controller(&source);

        scanner.start().await.unwrap();
        assert!(scanner.stop());
        assert!(!scanner.stop());
        assert!(!scanner.stop());
        assert_eq!(source.counters().releases(), 1);
    }

    #[tokio::test]
    async fn restart_while_active_keeps_capture() {
        let source = ScriptedScanSource::new().then_idle().then_idle();
        let mut scanner = controller(&source);

        scanner.start().await.unwrap();
        scanner.start().await.unwrap();
        assert_eq!(source.counters().opens(), 1);
    }

    #[tokio::test]
    async fn drop_releases_capture() {
        let source = ScriptedScanSource::new().then_idle();
        let counters = source.counters();
        {
            let mut scanner = controller(&source);
            scanner.start().await.unwrap();
            assert_eq!(counters.held(), 1);
        }
        assert_eq!(counters.releases(), 1);
        assert_eq!(counters.held(), 0);
    }

    #[tokio::test]
    async fn stop_then_drop_releases_once() {
        let source = ScriptedScanSource::new().then_idle();
        let counters = source.counters();
        {
            let mut scanner = controller(&source);
            scanner.start().await.unwrap();
            scanner.stop();
        }
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test]
    async fn cancelled_wait_keeps_capture() {
        let source = ScriptedScanSource::new().then_idle();
        let mut scanner = controller(&source);
        scanner.start().await.unwrap();

        // An idle script never decodes; stopping from another path is the only exit.
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            scanner.next_code(),
        )
        .await;
        assert!(waited.is_err());
        assert!(scanner.is_active());
        assert!(scanner.stop());
    }
}
