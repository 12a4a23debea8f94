//! Data layer seam and the in-memory store
//!
//! The scan view only reads the catalog and appends complaints; persistence
//! and querying beyond that belong to whatever implements [`DataLayer`].

use crate::error::DataError;
use async_trait::async_trait;
use mtrack_model::{Complaint, Machine, MachineId, NewComplaint};
use parking_lot::RwLock;
use std::path::Path;

/// Machine catalog and complaint sink
#[async_trait]
pub trait DataLayer: Send + Sync {
    /// Ordered snapshot of all machines
    fn machines(&self) -> Vec<Machine>;

    /// Direct lookup by primary id
    fn machine_by_id(&self, id: &MachineId) -> Option<Machine>;

    /// Create a complaint
    ///
    /// # Errors
    /// Implementation specific; callers only distinguish success from failure.
    async fn add_complaint(&self, draft: NewComplaint) -> Result<Complaint, DataError>;
}

/// In-process store backed by an ordered machine list
#[derive(Debug, Default)]
pub struct InMemoryStore {
    machines: RwLock<Vec<Machine>>,
    complaints: RwLock<Vec<Complaint>>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store holding `machines` in the given order
    #[inline]
    #[must_use]
    pub fn with_machines(machines: Vec<Machine>) -> Self {
        Self {
            machines: RwLock::new(machines),
            complaints: RwLock::new(Vec::new()),
        }
    }

    /// Parse a JSON array of machines
    ///
    /// # Errors
    /// - `DataError::Json` if the input is not a machine array
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let machines: Vec<Machine> = serde_json::from_str(json)?;
        Ok(Self::with_machines(machines))
    }

    /// Load a JSON machine catalog from disk
    ///
    /// # Errors
    /// - `DataError::Io` if the file cannot be read
    /// - `DataError::Json` if it is not a machine array
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| DataError::io_error(path, e))?;
        let store = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), machines = store.machine_count(), "Loaded machine catalog");
        Ok(store)
    }

    /// Append a machine to the catalog
    pub fn insert_machine(&self, machine: Machine) {
        self.machines.write().push(machine);
    }

    /// Number of machines in the catalog
    #[inline]
    #[must_use]
    pub fn machine_count(&self) -> usize {
        self.machines.read().len()
    }

    /// Stored complaints in insertion order
    #[must_use]
    pub fn complaints(&self) -> Vec<Complaint> {
        self.complaints.read().clone()
    }

    fn validate(&self, draft: &NewComplaint) -> Result<(), DataError> {
        if draft.description.trim().is_empty() {
            return Err(DataError::InvalidComplaint(
                "description must not be blank".to_string(),
            ));
        }
        let known = self.machines.read().iter().any(|m| m.id == draft.machine_id);
        if !known {
            return Err(DataError::UnknownMachine(draft.machine_id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl DataLayer for InMemoryStore {
    fn machines(&self) -> Vec<Machine> {
        self.machines.read().clone()
    }

    fn machine_by_id(&self, id: &MachineId) -> Option<Machine> {
        self.machines.read().iter().find(|m| &m.id == id).cloned()
    }

    async fn add_complaint(&self, draft: NewComplaint) -> Result<Complaint, DataError> {
        self.validate(&draft)?;

        let complaint = Complaint::accept(draft);
        tracing::info!(
            complaint_id = %complaint.id,
            machine_id = %complaint.draft.machine_id,
            raised_by = %complaint.draft.raised_by,
            "Complaint stored"
        );
        self.complaints.write().push(complaint.clone());
        Ok(complaint)
    }
}
