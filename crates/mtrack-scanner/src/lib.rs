//! mtrack Scanner
//!
//! Camera capture and QR decoding as a scoped resource:
//! - **ScanSource**: capability that turns a video surface into a stream of
//!   decoded strings
//! - **Capture**: one acquired camera stream; released exactly once, on
//!   `release()` or on drop
//! - **ScannerController**: start/stop lifecycle with single-shot decoding
//!
//! Two sources ship with the crate: [`CommandScanSource`] drives a decoder
//! process attached to a capture device, [`ScriptedScanSource`] replays
//! scripted outcomes for tests.
//!
//! # Example
//!
//! ```rust
//! use mtrack_scanner::{ScannerController, ScriptedScanSource, ScanOptions, VideoSurface};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), mtrack_scanner::ScannerError> {
//! let source = ScriptedScanSource::new().then_decode(["QR1"]);
//! let mut scanner = ScannerController::new(
//!     Arc::new(source),
//!     VideoSurface::new("/dev/video0"),
//!     ScanOptions::default(),
//! );
//!
//! scanner.start().await?;
//! assert_eq!(scanner.next_code().await.as_deref(), Some("QR1"));
//! assert!(!scanner.is_active());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod capture;
pub mod command;
pub mod controller;
pub mod error;
pub mod scripted;

pub use capture::{Capture, ScanOptions, ScanSource, VideoSurface};
pub use command::{CommandScanSource, DecoderCommand};
pub use controller::ScannerController;
pub use error::ScannerError;
pub use scripted::{ScanCounters, ScriptedScanSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
