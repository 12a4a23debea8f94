//! Machine scan view
//!
//! Holds the page state and reacts to user actions. Three concerns share the
//! state:
//! - Scanner lifecycle: start/stop the camera, take the first decoded code
//! - Lookup: resolve the scanned id against a fresh catalog snapshot
//! - Submission: build the complaint draft and hand it to the data layer
//!
//! # Submission states
//!
//! ```text
//! Idle -> Submitting -> Succeeded | Failed
//! Succeeded | Failed -> Submitting   (next attempt overwrites the flags)
//! ```
//!
//! One attempt per user action; no retry.

use crate::config::ViewConfig;
use crate::lookup::find_machine;
use crate::render::ViewSnapshot;
use mtrack_data::{AuthContext, DataError, DataLayer};
use mtrack_model::{Complaint, Machine, NewComplaint};
use mtrack_scanner::{ScanSource, ScannerController};
use std::sync::Arc;

/// Ephemeral page state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Last scanned or submitted identifier
    pub scanned_id: String,
    /// Manual entry field
    pub manual_id: String,
    /// Inline error message
    pub error: Option<String>,
    /// Complaint text field
    pub complaint_text: String,
    /// Complaint submission in flight
    pub submitting: bool,
    /// Last complaint was accepted
    pub success: bool,
    /// Last complaint attempt was rejected by the data layer
    pub submission_failed: bool,
    /// Camera capture active
    pub scanning: bool,
}

impl ViewState {
    /// Submission phase derived from the flags
    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        if self.submitting {
            SubmissionPhase::Submitting
        } else if self.success {
            SubmissionPhase::Succeeded
        } else if self.submission_failed {
            SubmissionPhase::Failed
        } else {
            SubmissionPhase::Idle
        }
    }
}

/// Complaint submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Nothing submitted, or flags cleared
    Idle,
    /// Waiting on the data layer
    Submitting,
    /// Last attempt accepted
    Succeeded,
    /// Last attempt was rejected
    Failed,
}

/// Result of a submit action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard tripped (no machine, no user, empty text, or already submitting)
    Skipped,
    /// Data layer accepted the complaint
    Raised(Complaint),
    /// Data layer failed; the text is kept for another attempt
    Failed,
}

/// The machine scan page
pub struct MachineScanView {
    data: Arc<dyn DataLayer>,
    auth: Arc<dyn AuthContext>,
    scanner: ScannerController,
    config: ViewConfig,
    state: ViewState,
}

impl MachineScanView {
    /// Create view over its collaborators
    ///
    /// The camera is not touched until [`start_scanning`](Self::start_scanning).
    #[must_use]
    pub fn new(
        data: Arc<dyn DataLayer>,
        auth: Arc<dyn AuthContext>,
        source: Arc<dyn ScanSource>,
        config: ViewConfig,
    ) -> Self {
        let scanner =
            ScannerController::new(source, config.scanner.surface(), config.scanner.options);
        Self {
            data,
            auth,
            scanner,
            config,
            state: ViewState::default(),
        }
    }

    /// Current page state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    // Scanner lifecycle

    /// Start the camera
    ///
    /// Failure is reported through the error field, never returned.
    pub async fn start_scanning(&mut self) {
        self.state.error = None;
        self.state.scanning = true;

        if let Err(e) = self.scanner.start().await {
            tracing::warn!(error = %e, "Scan view could not start camera");
            self.state.error = Some(self.config.messages.camera_error.clone());
            self.state.scanning = false;
        }
    }

    /// Stop the camera; safe to call when already stopped
    pub fn stop_scanning(&mut self) {
        self.scanner.stop();
        self.state.scanning = false;
    }

    /// Wait for one decoded code and make it the scanned id
    ///
    /// The camera is stopped afterwards whether or not a code arrived.
    pub async fn await_scan(&mut self) -> Option<String> {
        let code = self.scanner.next_code().await;
        if let Some(code) = &code {
            self.state.scanned_id.clone_from(code);
        }
        self.state.scanning = self.scanner.is_active();
        code
    }

    // Lookup

    /// Edit the manual entry field
    pub fn set_manual_id(&mut self, manual_id: impl Into<String>) {
        self.state.manual_id = manual_id.into();
    }

    /// Use the manual entry as the scanned id
    pub fn submit_manual_id(&mut self) {
        self.state.scanned_id.clone_from(&self.state.manual_id);
        self.state.error = None;
        tracing::debug!(scanned_id = %self.state.scanned_id, "Manual id submitted");
    }

    /// Machine matching the scanned id, from a fresh catalog snapshot
    #[must_use]
    pub fn current_machine(&self) -> Option<Machine> {
        let machines = self.data.machines();
        find_machine(&machines, &self.state.scanned_id).cloned()
    }

    // Submission

    /// Edit the complaint text field
    pub fn set_complaint_text(&mut self, text: impl Into<String>) {
        self.state.complaint_text = text.into();
    }

    /// Whether the submit control is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.state.submitting
            && !self.state.complaint_text.is_empty()
            && self.auth.current_user().is_some()
            && self.current_machine().is_some()
    }

    /// Synchronous half of a submit: guard, mark in flight, build the draft
    ///
    /// Returns `None` without touching state when there is no machine, no
    /// user, no text, or a submission is already in flight.
    pub fn begin_submission(&mut self) -> Option<NewComplaint> {
        if self.state.submitting {
            tracing::debug!("Submission already in flight, ignoring");
            return None;
        }
        if self.state.complaint_text.is_empty() {
            return None;
        }
        let machine = self.current_machine()?;
        let user = self.auth.current_user()?;

        self.state.submitting = true;
        self.state.error = None;
        self.state.success = false;
        self.state.submission_failed = false;

        let draft = NewComplaint::raise(&machine, &user, self.state.complaint_text.clone());
        tracing::info!(
            machine_id = %draft.machine_id,
            raised_by = %draft.raised_by,
            urgency = draft.urgency.as_str(),
            status = draft.status.as_str(),
            "Raising complaint"
        );
        Some(draft)
    }

    /// Apply the data layer's answer; clears the in-flight flag either way
    pub fn finish_submission(&mut self, result: Result<Complaint, DataError>) -> SubmitOutcome {
        self.state.submitting = false;
        match result {
            Ok(complaint) => {
                tracing::info!(complaint_id = %complaint.id, "Complaint raised");
                self.state.success = true;
                self.state.complaint_text.clear();
                SubmitOutcome::Raised(complaint)
            }
            Err(e) => {
                tracing::error!(error = %e, "Complaint submission failed");
                self.state.error = Some(self.config.messages.complaint_error.clone());
                self.state.submission_failed = true;
                SubmitOutcome::Failed
            }
        }
    }

    /// Submit the complaint form: one attempt, no retry
    pub async fn submit_complaint(&mut self) -> SubmitOutcome {
        let Some(draft) = self.begin_submission() else {
            return SubmitOutcome::Skipped;
        };
        let result = self.data.add_complaint(draft).await;
        self.finish_submission(result)
    }

    // Rendering

    /// What the page shows right now
    #[must_use]
    pub fn render(&self) -> ViewSnapshot {
        ViewSnapshot::build(
            &self.state,
            &self.config.messages,
            self.current_machine().as_ref(),
            self.can_submit(),
        )
    }
}

impl std::fmt::Debug for MachineScanView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineScanView")
            .field("scanner", &self.scanner)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
