//! mtrack View
//!
//! The machine scan page as a headless view model:
//! - Scan a QR label (or type an id) to resolve a machine
//! - Show the machine's details
//! - File a complaint against it as the signed-in user
//!
//! All collaborators are passed in at construction, so the view runs the same
//! against a real camera and store as against scripted test doubles.
//!
//! # Example
//!
//! ```rust
//! use mtrack_data::{InMemoryStore, StaticAuth};
//! use mtrack_model::{Machine, User};
//! use mtrack_scanner::ScriptedScanSource;
//! use mtrack_view::{MachineScanView, ViewConfig};
//! use std::sync::Arc;
//!
//! let store = InMemoryStore::with_machines(vec![Machine::new("m1", "QR1", "Press A")]);
//! let auth = StaticAuth::signed_in(User::new("u1", "Dana", "operator"));
//!
//! let mut view = MachineScanView::new(
//!     Arc::new(store),
//!     Arc::new(auth),
//!     Arc::new(ScriptedScanSource::new()),
//!     ViewConfig::default(),
//! );
//!
//! view.set_manual_id("QR1");
//! view.submit_manual_id();
//! assert_eq!(view.current_machine().map(|m| m.name), Some("Press A".to_string()));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod lookup;
pub mod render;
pub mod view;

pub use config::{Messages, ScannerConfig, ViewConfig};
pub use error::ViewError;
pub use lookup::find_machine;
pub use render::{CameraPanel, ComplaintForm, MachineCard, ViewBody, ViewSnapshot};
pub use view::{MachineScanView, SubmissionPhase, SubmitOutcome, ViewState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the scan view
    pub use crate::{MachineScanView, SubmitOutcome, ViewConfig, ViewSnapshot};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
