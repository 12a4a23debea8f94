//! Testing utilities for mtrack workspace
//!
//! Shared fixtures and a data layer that records what it was asked to store.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::NaiveDate;
use mtrack_data::{DataError, DataLayer, InMemoryStore};
use mtrack_model::{Complaint, Machine, MachineId, NewComplaint, User};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn press_a() -> Machine {
    Machine::new("m1", "QR1", "Press A")
        .with_department("Mfg")
        .with_status("active")
        .with_health(90)
        .with_service_dates(
            NaiveDate::from_ymd_opt(2024, 1, 10),
            NaiveDate::from_ymd_opt(2024, 7, 10),
        )
}

pub fn lathe_b() -> Machine {
    Machine::new("m2", "QR2", "Lathe B")
        .with_department("Tooling")
        .with_status("maintenance")
        .with_health(55)
}

pub fn sample_catalog() -> Vec<Machine> {
    vec![press_a(), lathe_b()]
}

pub fn operator() -> User {
    User::new("u1", "Dana", "operator")
}

/// Data layer over an [`InMemoryStore`] that records every draft it receives
/// and can be switched into failure mode
#[derive(Debug, Default)]
pub struct RecordingDataLayer {
    store: InMemoryStore,
    recorded: Mutex<Vec<NewComplaint>>,
    failing: AtomicBool,
}

impl RecordingDataLayer {
    pub fn new(machines: Vec<Machine>) -> Self {
        Self {
            store: InMemoryStore::with_machines(machines),
            recorded: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Every `add_complaint` fails with `DataError::Unavailable`
    #[must_use]
    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn insert_machine(&self, machine: Machine) {
        self.store.insert_machine(machine);
    }

    /// Drafts received so far, including failed attempts
    pub fn recorded(&self) -> Vec<NewComplaint> {
        self.recorded.lock().clone()
    }

    pub fn stored(&self) -> Vec<Complaint> {
        self.store.complaints()
    }
}

#[async_trait]
impl DataLayer for RecordingDataLayer {
    fn machines(&self) -> Vec<Machine> {
        self.store.machines()
    }

    fn machine_by_id(&self, id: &MachineId) -> Option<Machine> {
        self.store.machine_by_id(id)
    }

    async fn add_complaint(&self, draft: NewComplaint) -> Result<Complaint, DataError> {
        self.recorded.lock().push(draft.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(DataError::Unavailable("scripted failure".to_string()));
        }
        self.store.add_complaint(draft).await
    }
}
