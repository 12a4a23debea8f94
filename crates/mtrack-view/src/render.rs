//! Render snapshot of the scan page
//!
//! A plain description of what the page shows. Front ends draw it however
//! they like; `Display` gives the terminal rendering.

use crate::config::Messages;
use crate::view::ViewState;
use mtrack_model::Machine;
use std::fmt;

/// Everything the page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Page heading
    pub title: String,
    /// Camera panel
    pub camera: CameraPanel,
    /// Label of the camera toggle
    pub camera_button: &'static str,
    /// Manual entry field content
    pub manual_id: String,
    /// Manual entry placeholder
    pub manual_hint: String,
    /// Inline error
    pub error: Option<String>,
    /// Machine card or hint
    pub body: ViewBody,
}

/// Camera panel state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraPanel {
    /// Live preview showing
    Preview,
    /// Placeholder shown instead of the preview
    Idle(String),
}

/// Main body of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    /// A machine is resolved
    Machine(MachineCard),
    /// Nothing resolved yet
    Hint(String),
}

/// Machine details with the complaint form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineCard {
    /// Machine name
    pub name: String,
    /// Department
    pub department: String,
    /// Status
    pub status: String,
    /// Health in percent
    pub health: u8,
    /// Last service date, empty when unknown
    pub last_service: String,
    /// Next service date, empty when unknown
    pub next_service: String,
    /// Complaint form
    pub form: ComplaintForm,
}

/// Complaint form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintForm {
    /// Text field content
    pub text: String,
    /// Text field placeholder
    pub hint: String,
    /// Submit button label
    pub submit_label: &'static str,
    /// Submit button disabled
    pub submit_disabled: bool,
    /// Success banner
    pub success: Option<String>,
}

impl ViewSnapshot {
    pub(crate) fn build(
        state: &ViewState,
        messages: &Messages,
        machine: Option<&Machine>,
        can_submit: bool,
    ) -> Self {
        let camera = if state.scanning {
            CameraPanel::Preview
        } else {
            CameraPanel::Idle(messages.camera_idle_hint.clone())
        };

        let body = match machine {
            Some(machine) => ViewBody::Machine(MachineCard {
                name: machine.name.clone(),
                department: machine.department.clone(),
                status: machine.status.clone(),
                health: machine.health_status,
                last_service: machine
                    .last_service_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                next_service: machine
                    .next_service_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                form: ComplaintForm {
                    text: state.complaint_text.clone(),
                    hint: messages.complaint_hint.clone(),
                    submit_label: if state.submitting {
                        "Submitting..."
                    } else {
                        "Submit Complaint"
                    },
                    submit_disabled: !can_submit,
                    success: state.success.then(|| messages.complaint_success.clone()),
                },
            }),
            None => ViewBody::Hint(messages.no_machine_hint.clone()),
        };

        Self {
            title: messages.title.clone(),
            camera,
            camera_button: if state.scanning {
                "Stop Scanning"
            } else {
                "Start Scanning"
            },
            manual_id: state.manual_id.clone(),
            manual_hint: messages.manual_entry_hint.clone(),
            error: state.error.clone(),
            body,
        }
    }

    /// Resolved machine card, if any
    #[inline]
    #[must_use]
    pub fn machine(&self) -> Option<&MachineCard> {
        match &self.body {
            ViewBody::Machine(card) => Some(card),
            ViewBody::Hint(_) => None,
        }
    }
}

impl fmt::Display for ViewSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        match &self.camera {
            CameraPanel::Preview => writeln!(f, "[camera: scanning]")?,
            CameraPanel::Idle(hint) => writeln!(f, "[camera: {hint}]")?,
        }
        writeln!(f, "({})", self.camera_button)?;
        if self.manual_id.is_empty() {
            writeln!(f, "Manual entry: <{}>", self.manual_hint)?;
        } else {
            writeln!(f, "Manual entry: {}", self.manual_id)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "! {error}")?;
        }

        match &self.body {
            ViewBody::Hint(hint) => writeln!(f, "{hint}"),
            ViewBody::Machine(card) => {
                writeln!(f, "{}", card.name)?;
                writeln!(f, "  Department: {}", card.department)?;
                writeln!(f, "  Status: {}", card.status)?;
                writeln!(f, "  Health: {}%", card.health)?;
                writeln!(f, "  Last Service: {}", card.last_service)?;
                writeln!(f, "  Next Service: {}", card.next_service)?;
                writeln!(f, "Raise Complaint")?;
                if card.form.text.is_empty() {
                    writeln!(f, "  <{}>", card.form.hint)?;
                } else {
                    writeln!(f, "  {}", card.form.text)?;
                }
                let disabled = if card.form.submit_disabled { " (disabled)" } else { "" };
                writeln!(f, "  [{}]{disabled}", card.form.submit_label)?;
                if let Some(success) = &card.form.success {
                    writeln!(f, "  {success}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtrack_test_utils::press_a;
    use pretty_assertions::assert_eq;

    #[test]
    fn hint_when_nothing_resolved() {
        let snapshot = ViewSnapshot::build(&ViewState::default(), &Messages::default(), None, false);

        assert_eq!(
            snapshot.body,
            ViewBody::Hint("Scan a machine QR code or enter its ID to view details.".to_string())
        );
        assert_eq!(snapshot.camera_button, "Start Scanning");
        assert!(matches!(snapshot.camera, CameraPanel::Idle(_)));
        assert!(snapshot.machine().is_none());
    }

    #[test]
    fn machine_card_fields() {
        let machine = press_a();
        let state = ViewState {
            complaint_text: "Leak".to_string(),
            ..ViewState::default()
        };

        let snapshot = ViewSnapshot::build(&state, &Messages::default(), Some(&machine), true);
        let card = snapshot.machine().unwrap();

        assert_eq!(card.name, "Press A");
        assert_eq!(card.department, "Mfg");
        assert_eq!(card.status, "active");
        assert_eq!(card.health, 90);
        assert_eq!(card.last_service, "2024-01-10");
        assert_eq!(card.form.submit_label, "Submit Complaint");
        assert!(!card.form.submit_disabled);
        assert_eq!(card.form.success, None);
    }

    #[test]
    fn submitting_and_success_labels() {
        let machine = press_a();
        let submitting = ViewState {
            submitting: true,
            complaint_text: "Leak".to_string(),
            ..ViewState::default()
        };
        let snapshot = ViewSnapshot::build(&submitting, &Messages::default(), Some(&machine), false);
        let form = &snapshot.machine().unwrap().form;
        assert_eq!(form.submit_label, "Submitting...");
        assert!(form.submit_disabled);

        let done = ViewState {
            success: true,
            ..ViewState::default()
        };
        let snapshot = ViewSnapshot::build(&done, &Messages::default(), Some(&machine), false);
        assert_eq!(
            snapshot.machine().unwrap().form.success.as_deref(),
            Some("Complaint raised successfully!")
        );
    }

    #[test]
    fn scanning_shows_preview_and_stop() {
        let state = ViewState {
            scanning: true,
            ..ViewState::default()
        };
        let snapshot = ViewSnapshot::build(&state, &Messages::default(), None, false);
        assert_eq!(snapshot.camera, CameraPanel::Preview);
        assert_eq!(snapshot.camera_button, "Stop Scanning");
    }

    #[test]
    fn terminal_rendering() {
        let machine = press_a();
        let state = ViewState {
            scanned_id: "QR1".to_string(),
            manual_id: "QR1".to_string(),
            error: Some("Failed to raise complaint.".to_string()),
            ..ViewState::default()
        };

        let text = ViewSnapshot::build(&state, &Messages::default(), Some(&machine), false).to_string();

        assert!(text.starts_with("== Scan Machine QR ==\n"));
        assert!(text.contains("Manual entry: QR1\n"));
        assert!(text.contains("! Failed to raise complaint.\n"));
        assert!(text.contains("Press A\n  Department: Mfg\n"));
        assert!(text.contains("  Health: 90%\n"));
        assert!(text.contains("  <Describe the issue...>\n"));
        assert!(text.contains("[Submit Complaint] (disabled)"));
    }
}
