//! Scripted scan source for tests and demos

use crate::capture::{Capture, ScanOptions, ScanSource, VideoSurface};
use crate::error::ScannerError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of one `open` call
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Camera acquired, these codes decoded in order, then the stream idles
    Decode(Vec<String>),
    /// Camera acquired, nothing ever decoded
    Idle,
    /// Permission refused
    Deny,
    /// No device
    Unavailable,
}

/// Open/release bookkeeping shared with every clone of the source
#[derive(Debug, Clone, Default)]
pub struct ScanCounters {
    opens: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl ScanCounters {
    /// Successful acquisitions so far
    #[must_use]
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Releases so far
    #[must_use]
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Captures currently held
    #[must_use]
    pub fn held(&self) -> usize {
        self.opens().saturating_sub(self.releases())
    }
}

/// Scan source replaying a script of outcomes, one per `open`
///
/// Once the script is exhausted every further `open` acquires an idle camera.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScanSource {
    steps: Arc<Mutex<VecDeque<Step>>>,
    counters: ScanCounters,
}

impl ScriptedScanSource {
    /// Create source with an empty script
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next open decodes `codes`
    #[must_use]
    pub fn then_decode<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = codes.into_iter().map(Into::into).collect();
        self.push(Step::Decode(codes))
    }

    /// Next open acquires a camera that never decodes
    #[must_use]
    pub fn then_idle(self) -> Self {
        self.push(Step::Idle)
    }

    /// Next open is refused camera permission
    #[must_use]
    pub fn then_deny(self) -> Self {
        self.push(Step::Deny)
    }

    /// Next open finds no device
    #[must_use]
    pub fn then_unavailable(self) -> Self {
        self.push(Step::Unavailable)
    }

    /// Shared open/release counters
    #[inline]
    #[must_use]
    pub fn counters(&self) -> ScanCounters {
        self.counters.clone()
    }

    fn push(self, step: Step) -> Self {
        self.steps.lock().push_back(step);
        self
    }
}

#[async_trait]
impl ScanSource for ScriptedScanSource {
    async fn open(
        &self,
        surface: &VideoSurface,
        options: &ScanOptions,
    ) -> Result<Capture, ScannerError> {
        let step = self.steps.lock().pop_front().unwrap_or(Step::Idle);

        let codes = match step {
            Step::Deny => {
                return Err(ScannerError::PermissionDenied(format!(
                    "access to {surface} refused"
                )))
            }
            Step::Unavailable => {
                return Err(ScannerError::DeviceUnavailable(format!("{surface} not found")))
            }
            Step::Decode(codes) => codes,
            Step::Idle => Vec::new(),
        };

        let (tx, rx) = mpsc::channel(options.buffer.max(codes.len()).max(1));
        for code in codes {
            // Capacity covers the whole script.
            let _ = tx.try_send(code);
        }

        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let releases = Arc::clone(&self.counters.releases);
        Ok(Capture::new(rx, move || {
            drop(tx);
            releases.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order() {
        let source = ScriptedScanSource::new().then_deny().then_decode(["QR1", "QR2"]);
        let surface = VideoSurface::default();
        let options = ScanOptions::default();

        let denied = source.open(&surface, &options).await;
        assert!(matches!(denied, Err(ScannerError::PermissionDenied(_))));

        let mut capture = source.open(&surface, &options).await.unwrap();
        assert_eq!(capture.recv().await.as_deref(), Some("QR1"));
        assert_eq!(capture.recv().await.as_deref(), Some("QR2"));

        let counters = source.counters();
        assert_eq!(counters.opens(), 1);
        assert_eq!(counters.held(), 1);

        drop(capture);
        assert_eq!(counters.releases(), 1);
        assert_eq!(counters.held(), 0);
    }

    #[tokio::test]
    async fn idle_capture_stays_open() {
        let source = ScriptedScanSource::new();
        let mut capture = source
            .open(&VideoSurface::default(), &ScanOptions::default())
            .await
            .unwrap();

        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), capture.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn unavailable_device() {
        let source = ScriptedScanSource::new().then_unavailable();
        let result = source
            .open(&VideoSurface::new("/dev/video7"), &ScanOptions::default())
            .await;
        match result {
            Err(ScannerError::DeviceUnavailable(msg)) => assert!(msg.contains("/dev/video7")),
            other => panic!("expected unavailable, got {other:?}"),
        }
        assert_eq!(source.counters().opens(), 0);
    }
}
