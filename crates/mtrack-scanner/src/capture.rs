//! Capture sources and the acquired capture handle

use crate::error::ScannerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Decoder overlay and buffering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Draw the scan region on the preview
    pub highlight_scan_region: bool,
    /// Outline detected codes on the preview
    pub highlight_code_outline: bool,
    /// Decoded strings buffered before the decoder is back-pressured
    pub buffer: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            highlight_scan_region: true,
            highlight_code_outline: true,
            buffer: 16,
        }
    }
}

/// Surface the camera renders into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoSurface {
    device: String,
}

impl VideoSurface {
    /// Surface backed by `device` (e.g. `/dev/video0`)
    #[inline]
    #[must_use]
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Device name
    #[inline]
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Default for VideoSurface {
    fn default() -> Self {
        Self::new("/dev/video0")
    }
}

impl std::fmt::Display for VideoSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.device)
    }
}

/// Camera plus decoder capability
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Acquire the camera behind `surface` and start decoding
    ///
    /// # Errors
    /// Any failure to acquire the camera; nothing is held on error.
    async fn open(
        &self,
        surface: &VideoSurface,
        options: &ScanOptions,
    ) -> Result<Capture, ScannerError>;
}

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// An acquired camera stream
///
/// The release hook runs exactly once: on [`Capture::release`] or on drop,
/// whichever comes first.
pub struct Capture {
    codes: mpsc::Receiver<String>,
    release: Option<ReleaseFn>,
}

impl Capture {
    /// Wrap a decoded-string stream and the hook that frees the camera
    #[must_use]
    pub fn new(codes: mpsc::Receiver<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            codes,
            release: Some(Box::new(release)),
        }
    }

    /// Next decoded string, `None` once the decoder stream has ended
    pub async fn recv(&mut self) -> Option<String> {
        self.codes.recv().await
    }

    /// Release the camera
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            self.codes.close();
            release();
        }
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("released", &self.release.is_none())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted_capture(buffer: usize) -> (mpsc::Sender<String>, Capture, Arc<AtomicUsize>) {
        let (tx, rx) = mpsc::channel(buffer);
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let capture = Capture::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (tx, capture, released)
    }

    #[tokio::test]
    async fn recv_yields_decoded_strings() {
        let (tx, mut capture, _) = counted_capture(4);
        tx.send("QR1".to_string()).await.unwrap();
        drop(tx);

        assert_eq!(capture.recv().await.as_deref(), Some("QR1"));
        assert_eq!(capture.recv().await, None);
    }

    #[test]
    fn release_runs_once() {
        let (_tx, capture, released) = counted_capture(1);
        capture.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases() {
        let (_tx, capture, released) = counted_capture(1);
        drop(capture);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn release_closes_stream_for_decoder() {
        let (tx, capture, _) = counted_capture(1);
        capture.release();
        assert!(tx.send("late".to_string()).await.is_err());
    }
}
