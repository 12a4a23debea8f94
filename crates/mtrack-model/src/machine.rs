//! Machine records
//!
//! Machines are owned and persisted by the data layer; everything here is
//! read-only from the point of view of the scan view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Primary machine identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub String);

impl MachineId {
    /// Create new machine ID
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MachineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MachineId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A tracked machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Primary identifier
    pub id: MachineId,
    /// Content of the QR label attached to the machine
    pub qr_code: String,
    /// Display name
    pub name: String,
    /// Owning department
    #[serde(default)]
    pub department: String,
    /// Operational status as reported by the data layer (e.g. "active")
    #[serde(default)]
    pub status: String,
    /// Health in percent
    #[serde(default)]
    pub health_status: u8,
    /// Last service date
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    /// Next scheduled service date
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
}

impl Machine {
    /// Create new machine with empty details
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        qr_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: MachineId::new(id),
            qr_code: qr_code.into(),
            name: name.into(),
            department: String::new(),
            status: String::new(),
            health_status: 0,
            last_service_date: None,
            next_service_date: None,
        }
    }

    /// With department
    #[inline]
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// With health percentage (clamped to 100)
    #[inline]
    #[must_use]
    pub fn with_health(mut self, percent: u8) -> Self {
        self.health_status = percent.min(100);
        self
    }

    /// With service dates
    #[inline]
    #[must_use]
    pub fn with_service_dates(mut self, last: Option<NaiveDate>, next: Option<NaiveDate>) -> Self {
        self.last_service_date = last;
        self.next_service_date = next;
        self
    }

    /// Whether `candidate` names this machine, by QR code or by primary id
    #[inline]
    #[must_use]
    pub fn answers_to(&self, candidate: &str) -> bool {
        self.qr_code == candidate || self.id.as_str() == candidate
    }
}
