//! Activity (audit trail) model.

use crate::model::patient::PatientId;
use crate::model::timestamp_label;
use serde::{Deserialize, Serialize};

/// Fixed set of audited operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    Add,
    Delete,
    Update,
    View,
    Queue,
    Process,
    Load,
    Sample,
    Clear,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::View => "VIEW",
            Self::Queue => "QUEUE",
            Self::Process => "PROCESS",
            Self::Load => "LOAD",
            Self::Sample => "SAMPLE",
            Self::Clear => "CLEAR",
        }
    }
}

/// Identifier recorded for system-wide entries (load/sample/clear).
pub const SYSTEM_PATIENT_ID: PatientId = 0;
/// Display name recorded for system-wide entries.
pub const SYSTEM_ACTOR_NAME: &str = "System";

/// One immutable audit entry.
///
/// Fields are private so an entry cannot be edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    action: ActivityKind,
    patient_id: PatientId,
    patient_name: String,
    details: String,
    timestamp: String,
}

impl ActivityEntry {
    /// Creates an entry stamped with the current local time.
    pub fn new(
        action: ActivityKind,
        patient_id: PatientId,
        patient_name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(action, patient_id, patient_name, details, timestamp_label())
    }

    /// Creates an entry with a caller-provided timestamp label.
    pub fn with_timestamp(
        action: ActivityKind,
        patient_id: PatientId,
        patient_name: impl Into<String>,
        details: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            action,
            patient_id,
            patient_name: patient_name.into(),
            details: details.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Creates a system-wide entry (`patient_id = 0`, name `System`).
    pub fn system(action: ActivityKind, details: impl Into<String>) -> Self {
        Self::new(action, SYSTEM_PATIENT_ID, SYSTEM_ACTOR_NAME, details)
    }

    pub fn action(&self) -> ActivityKind {
        self.action
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
