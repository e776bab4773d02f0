//! Serializable full-store snapshot.
//!
//! Wire shape: `{"patients": [...], "nextId": 1006, "savedAt": "..."}`.
//! Persisting the document is the caller's job; core only builds and
//! restores it.

use crate::model::activity::SYSTEM_PATIENT_ID;
use crate::model::patient::{Patient, PatientId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Records in store listing order (newest first).
    #[serde(default)]
    pub patients: Vec<Patient>,
    /// Counter value at capture time.
    #[serde(default)]
    pub next_id: PatientId,
    #[serde(default)]
    pub saved_at: String,
}

impl Snapshot {
    /// Checks that the snapshot can be restored without breaking store
    /// invariants.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::with_capacity(self.patients.len());
        for patient in &self.patients {
            if patient.patient_id == SYSTEM_PATIENT_ID {
                return Err(SnapshotError::ReservedId);
            }
            if !seen.insert(patient.patient_id) {
                return Err(SnapshotError::DuplicateId(patient.patient_id));
            }
        }
        Ok(())
    }

    /// Highest patient id contained in the snapshot.
    pub fn max_patient_id(&self) -> Option<PatientId> {
        self.patients.iter().map(|patient| patient.patient_id).max()
    }
}

/// Snapshot rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    DuplicateId(PatientId),
    ReservedId,
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "snapshot contains duplicate patient id {id}"),
            Self::ReservedId => write!(
                f,
                "snapshot contains reserved patient id {SYSTEM_PATIENT_ID}"
            ),
        }
    }
}

impl Error for SnapshotError {}
