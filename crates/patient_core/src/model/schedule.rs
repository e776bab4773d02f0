//! Schedule queue entry model.

use crate::model::patient::PatientId;
use crate::model::timestamp_label;
use serde::{Deserialize, Serialize};

/// One waiting-list entry.
///
/// `position` is derived by the owning queue (dense, 1-indexed) and is
/// rewritten on every removal; it is not an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub patient_id: PatientId,
    pub patient_name: String,
    /// Scheduled time label copied from the record at enqueue time.
    pub appointment_time: String,
    /// Local time the entry joined the queue.
    pub registration_time: String,
    pub position: u32,
}

impl ScheduleEntry {
    /// Creates an unpositioned entry stamped with the current local time.
    pub fn new(
        patient_id: PatientId,
        patient_name: impl Into<String>,
        appointment_time: impl Into<String>,
    ) -> Self {
        Self {
            patient_id,
            patient_name: patient_name.into(),
            appointment_time: appointment_time.into(),
            registration_time: timestamp_label(),
            position: 0,
        }
    }
}
