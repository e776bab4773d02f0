//! Serializable response envelopes for command-surface callers.
//!
//! # Invariants
//! - Every command returns `ApiResponse<T>`; `ok == data.is_some()` except
//!   for unit payloads.
//! - JSON keys are camelCase.

use crate::error::ApiError;
use patient_core::{ActivityEntry, Patient, ScheduleEntry, Statistics};
use serde::Serialize;
use std::path::PathBuf;

/// Generic envelope: success flag, human-readable message, optional payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            data: None,
        }
    }

    pub(crate) fn from_error(err: &ApiError) -> Self {
        Self::failure(err.to_string())
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Renders the envelope as compact JSON.
    pub fn to_json(&self) -> Result<String, ApiError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListData {
    pub count: usize,
    pub patients: Vec<Patient>,
}

impl From<Vec<Patient>> for PatientListData {
    fn from(patients: Vec<Patient>) -> Self {
        Self {
            count: patients.len(),
            patients,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueAddData {
    pub position: u32,
    pub queue_size: usize,
    pub entry: ScheduleEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessData {
    pub appointment: ScheduleEntry,
    pub remaining_in_queue: usize,
    /// `false` when the record was deleted while the entry waited.
    pub record_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingListData {
    pub queue_size: usize,
    pub waiting_list: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListData {
    /// Total retained entries, not the length of `activities`.
    pub count: usize,
    pub activities: Vec<ActivityEntry>,
}

/// Full export document (records, queue, counters).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub patients: Vec<Patient>,
    pub queue: Vec<ScheduleEntry>,
    pub statistics: Statistics,
    pub exported_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFileData {
    pub path: PathBuf,
    pub count: usize,
}
