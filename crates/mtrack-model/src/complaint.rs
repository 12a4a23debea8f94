//! Complaint drafts and stored complaints
//!
//! A [`NewComplaint`] is built transiently by the scan view and handed to the
//! data layer, which answers with a stored [`Complaint`].

use crate::machine::{Machine, MachineId};
use crate::user::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique complaint identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub Ulid);

impl ComplaintId {
    /// Generate new complaint ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ComplaintId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complaint urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Can wait for the next scheduled service
    Low,
    /// Default for complaints raised from a scan
    #[default]
    Medium,
    /// Needs attention this shift
    High,
    /// Machine unsafe to operate
    Critical,
}

impl Urgency {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

/// Complaint lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Newly raised
    #[default]
    Open,
    /// Picked up by maintenance
    InProgress,
    /// Fixed, awaiting confirmation
    Resolved,
    /// Closed
    Closed,
}

impl ComplaintStatus {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }
}

/// Complaint draft handed to the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    /// Machine the complaint is raised against
    pub machine_id: MachineId,
    /// Raising user's id
    pub raised_by: UserId,
    /// Raising user's display name
    pub raised_by_name: String,
    /// Raising user's role
    pub raised_by_role: String,
    /// Free-text description of the issue
    pub description: String,
    /// Urgency
    pub urgency: Urgency,
    /// Initial status
    pub status: ComplaintStatus,
    /// Escalation level, 0 when first raised
    pub escalation_level: u8,
}

impl NewComplaint {
    /// Draft a complaint from a scan: medium urgency, open, not escalated
    #[must_use]
    pub fn raise(machine: &Machine, user: &User, description: impl Into<String>) -> Self {
        Self {
            machine_id: machine.id.clone(),
            raised_by: user.id.clone(),
            raised_by_name: user.name.clone(),
            raised_by_role: user.role.clone(),
            description: description.into(),
            urgency: Urgency::Medium,
            status: ComplaintStatus::Open,
            escalation_level: 0,
        }
    }
}

/// Complaint as stored by the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    /// Assigned identifier
    pub id: ComplaintId,
    /// Submitted draft
    #[serde(flatten)]
    pub draft: NewComplaint,
    /// Time the store accepted the complaint
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    /// Accept a draft now
    #[inline]
    #[must_use]
    pub fn accept(draft: NewComplaint) -> Self {
        Self {
            id: ComplaintId::new(),
            draft,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press_a() -> Machine {
        Machine::new("m1", "QR1", "Press A")
            .with_department("Mfg")
            .with_status("active")
            .with_health(90)
    }

    #[test]
    fn raise_fills_fixed_defaults() {
        let user = User::new("u1", "Dana", "operator");
        let draft = NewComplaint::raise(&press_a(), &user, "Oil on the floor");

        assert_eq!(draft.machine_id.as_str(), "m1");
        assert_eq!(draft.raised_by, UserId::new("u1"));
        assert_eq!(draft.urgency, Urgency::Medium);
        assert_eq!(draft.status, ComplaintStatus::Open);
        assert_eq!(draft.escalation_level, 0);
    }

    #[test]
    fn draft_serializes_to_payload_shape() {
        let user = User::new("u1", "Dana", "operator");
        let draft = NewComplaint::raise(&press_a(), &user, "Oil on the floor");

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "machine_id": "m1",
                "raised_by": "u1",
                "raised_by_name": "Dana",
                "raised_by_role": "operator",
                "description": "Oil on the floor",
                "urgency": "medium",
                "status": "open",
                "escalation_level": 0
            })
        );
    }

    #[test]
    fn wire_names_match_serde() {
        for urgency in [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Critical] {
            let json = serde_json::to_string(&urgency).unwrap();
            assert_eq!(json, format!("\"{}\"", urgency.as_str()));
        }
        let json = serde_json::to_string(&ComplaintStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn stored_complaint_flattens_draft() {
        let user = User::new("u1", "Dana", "operator");
        let complaint = Complaint::accept(NewComplaint::raise(&press_a(), &user, "Noise"));

        let value = serde_json::to_value(&complaint).unwrap();
        assert_eq!(value["machine_id"], "m1");
        assert_eq!(value["description"], "Noise");
        assert!(value.get("id").is_some());
        assert!(value.get("created_at").is_some());
    }
}
