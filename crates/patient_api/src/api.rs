//! Use-case API over one shared patient manager.
//!
//! # Responsibility
//! - Expose stable, use-case-level commands to embedding callers.
//! - Validate external input before it reaches the manager.
//! - Wrap every result in an [`ApiResponse`] envelope.
//!
//! # Invariants
//! - Commands never panic; failures become `ok == false` envelopes.
//! - One mutex serializes every command against the manager.
//! - A poisoned mutex is recovered rather than propagated.

use crate::error::{ApiError, ApiResult};
use crate::response::{
    ActivityListData, ApiResponse, ExportDocument, PatientListData, ProcessData, QueueAddData,
    SnapshotFileData, WaitingListData,
};
use crate::settings::ApiSettings;
use crate::snapshot_file::{read_snapshot, remove_snapshot, write_snapshot};
use log::{info, warn};
use patient_core::model::timestamp_label;
use patient_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ActivityEntry, Patient, PatientFields, PatientId, PatientManager, ScheduleEntry, Statistics,
};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static SHARED_API: OnceLock<PatientApi> = OnceLock::new();

/// Minimal health check.
pub fn ping() -> String {
    ping_inner().to_owned()
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
pub fn init_logging(level: &str, log_dir: &str) -> String {
    match init_logging_inner(level, log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Process-wide instance configured from `PATIENT_CORE_*` variables.
pub fn shared() -> &'static PatientApi {
    SHARED_API.get_or_init(|| {
        PatientApi::new(ApiSettings::from_env()).unwrap_or_else(|err| {
            warn!("event=api_init module=api status=fallback error={err}");
            PatientApi::from_manager(PatientManager::new(), ApiSettings::default())
        })
    })
}

/// Command surface owning one [`PatientManager`] behind a mutex.
#[derive(Debug)]
pub struct PatientApi {
    manager: Mutex<PatientManager>,
    settings: ApiSettings,
}

impl PatientApi {
    /// # Errors
    /// - `Config` when the manager settings are rejected.
    pub fn new(settings: ApiSettings) -> ApiResult<Self> {
        let manager = PatientManager::with_config(settings.manager)?;
        Ok(Self::from_manager(manager, settings))
    }

    fn from_manager(manager: PatientManager, settings: ApiSettings) -> Self {
        Self {
            manager: Mutex::new(manager),
            settings,
        }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Registers a new patient with the next sequential id.
    pub fn patient_add(&self, fields: PatientFields) -> ApiResponse<Patient> {
        respond("Patient added successfully", || {
            let fields = checked(fields)?;
            Ok(self.lock().add_patient(fields)?)
        })
    }

    /// Same as [`PatientApi::patient_add`] with a JSON-encoded field set.
    pub fn patient_add_json(&self, json: &str) -> ApiResponse<Patient> {
        match serde_json::from_str::<PatientFields>(json) {
            Ok(fields) => self.patient_add(fields),
            Err(err) => rejected(ApiError::from(err)),
        }
    }

    /// Registers a patient under a caller-chosen id.
    pub fn patient_add_with_id(
        &self,
        patient_id: PatientId,
        fields: PatientFields,
    ) -> ApiResponse<Patient> {
        respond("Patient added successfully", || {
            let fields = checked(fields)?;
            Ok(self.lock().add_patient_with_id(patient_id, fields)?)
        })
    }

    /// Looks up one patient; logged as a view.
    pub fn patient_get(&self, patient_id: PatientId) -> ApiResponse<Patient> {
        respond("Patient found", || Ok(self.lock().search_patient(patient_id)?))
    }

    pub fn patient_update(
        &self,
        patient_id: PatientId,
        fields: PatientFields,
    ) -> ApiResponse<Patient> {
        respond("Patient updated successfully", || {
            let fields = checked(fields)?;
            Ok(self.lock().update_patient(patient_id, fields)?)
        })
    }

    pub fn patient_delete(&self, patient_id: PatientId) -> ApiResponse<Patient> {
        respond("Patient deleted successfully", || {
            Ok(self.lock().delete_patient(patient_id)?)
        })
    }

    /// Every patient, most recently registered first.
    pub fn patients_list(&self) -> ApiResponse<PatientListData> {
        let patients = self.lock().list_all();
        ApiResponse::success("Patients retrieved", PatientListData::from(patients))
    }

    /// Every patient in ascending id order.
    pub fn patients_sorted(&self) -> ApiResponse<PatientListData> {
        let patients = self.lock().list_sorted();
        ApiResponse::success("Patients retrieved", PatientListData::from(patients))
    }

    pub fn patients_search_by_name(&self, query: &str) -> ApiResponse<PatientListData> {
        respond("Search completed", || {
            if query.trim().is_empty() {
                return Err(ApiError::BadRequest("name query is required"));
            }
            Ok(PatientListData::from(self.lock().search_by_name(query)))
        })
    }

    pub fn queue_add(&self, patient_id: PatientId) -> ApiResponse<QueueAddData> {
        respond("Patient added to appointment queue", || {
            let mut manager = self.lock();
            let entry = manager.enqueue_for_schedule(patient_id)?;
            Ok(QueueAddData {
                position: entry.position,
                queue_size: manager.queue_len(),
                entry,
            })
        })
    }

    /// Dequeues the front entry; the record may since have been deleted.
    pub fn queue_process(&self) -> ApiResponse<ProcessData> {
        respond("Appointment processed", || {
            let mut manager = self.lock();
            let appointment = manager.process_next()?;
            Ok(ProcessData {
                record_exists: manager.contains(appointment.patient_id),
                remaining_in_queue: manager.queue_len(),
                appointment,
            })
        })
    }

    pub fn queue_peek(&self) -> ApiResponse<ScheduleEntry> {
        respond("Next appointment", || Ok(self.lock().peek_next()?))
    }

    pub fn queue_waiting_list(&self) -> ApiResponse<WaitingListData> {
        let waiting_list = self.lock().waiting_list();
        ApiResponse::success(
            "Waiting list retrieved",
            WaitingListData {
                queue_size: waiting_list.len(),
                waiting_list,
            },
        )
    }

    /// Newest-first activities; `None` or `0` means the default count.
    pub fn activities_recent(&self, count: Option<usize>) -> ApiResponse<ActivityListData> {
        let count = self.settings.recent_count(count);
        let manager = self.lock();
        ApiResponse::success(
            "Recent activities retrieved",
            ActivityListData {
                count: manager.activity_count(),
                activities: manager.recent_activities(count),
            },
        )
    }

    pub fn activities_all(&self) -> ApiResponse<ActivityListData> {
        let manager = self.lock();
        ApiResponse::success(
            "Activities retrieved",
            ActivityListData {
                count: manager.activity_count(),
                activities: manager.all_activities(),
            },
        )
    }

    /// Removes the newest activity entry. Record data is not reverted.
    pub fn activity_pop(&self) -> ApiResponse<ActivityEntry> {
        respond("Last activity removed", || {
            Ok(self.lock().pop_last_activity()?)
        })
    }

    pub fn statistics(&self) -> ApiResponse<Statistics> {
        ApiResponse::success("Statistics retrieved", self.lock().statistics())
    }

    pub fn sample_data_load(&self) -> ApiResponse<PatientListData> {
        match self.lock().load_sample_data() {
            Ok(added) => {
                let message = format!("{} sample patients loaded", added.len());
                ApiResponse::success(message, PatientListData::from(added))
            }
            Err(err) => rejected(ApiError::from(err)),
        }
    }

    /// Clears in-memory state and removes the snapshot file.
    pub fn data_clear(&self) -> ApiResponse<usize> {
        respond("All data cleared", || {
            let removed = self.lock().clear_all();
            remove_snapshot(&self.settings.data_path)?;
            Ok(removed)
        })
    }

    /// Records, waiting queue and statistics in one document.
    pub fn data_export(&self) -> ApiResponse<ExportDocument> {
        let manager = self.lock();
        ApiResponse::success(
            "Data exported",
            ExportDocument {
                patients: manager.list_all(),
                queue: manager.waiting_list(),
                statistics: manager.statistics(),
                exported_at: timestamp_label(),
            },
        )
    }

    /// Writes the current records to the configured snapshot file.
    pub fn snapshot_save(&self) -> ApiResponse<SnapshotFileData> {
        respond("Data saved", || {
            let snapshot = self.lock().snapshot();
            write_snapshot(&self.settings.data_path, &snapshot)?;
            Ok(SnapshotFileData {
                path: self.settings.data_path.clone(),
                count: snapshot.patients.len(),
            })
        })
    }

    /// Replaces in-memory records with the configured snapshot file.
    ///
    /// A missing file is a successful no-op with `count == 0`.
    pub fn snapshot_load(&self) -> ApiResponse<SnapshotFileData> {
        respond("Data loaded", || {
            let path = self.settings.data_path.clone();
            let Some(snapshot) = read_snapshot(&path)? else {
                info!(
                    "event=snapshot_load module=api status=skipped reason=missing path={}",
                    path.display()
                );
                return Ok(SnapshotFileData { path, count: 0 });
            };
            let count = self.lock().restore_snapshot(snapshot)?;
            Ok(SnapshotFileData { path, count })
        })
    }

    fn lock(&self) -> MutexGuard<'_, PatientManager> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn checked(fields: PatientFields) -> ApiResult<PatientFields> {
    fields.validate()?;
    Ok(fields.normalized())
}

fn respond<T>(message: &str, f: impl FnOnce() -> ApiResult<T>) -> ApiResponse<T> {
    match f() {
        Ok(data) => ApiResponse::success(message, data),
        Err(err) => rejected(err),
    }
}

fn rejected<T>(err: ApiError) -> ApiResponse<T> {
    warn!("event=api_command module=api status=error error={err}");
    ApiResponse::from_error(&err)
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, ping, PatientApi};
    use crate::settings::ApiSettings;
    use patient_core::{ActivityKind, Gender, PatientFields};

    fn api_in(dir: &tempfile::TempDir) -> PatientApi {
        PatientApi::new(ApiSettings::with_data_path(dir.path().join("snapshot.json")))
            .expect("api init")
    }

    fn fields(name: &str) -> PatientFields {
        PatientFields::new(name, 40, Gender::Male, "Fever")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info", "").is_empty());
    }

    #[test]
    fn add_validates_and_trims_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);

        let rejected = api.patient_add(fields(" A "));
        assert!(!rejected.ok);
        assert!(rejected.data.is_none());

        let too_old = api.patient_add(PatientFields::new("Old Timer", 151, Gender::Other, "Age"));
        assert!(!too_old.ok);

        let added = api.patient_add(fields("  Ali Raza  "));
        assert!(added.ok);
        let patient = added.data.expect("patient payload");
        assert_eq!(patient.patient_id, 1001);
        assert_eq!(patient.name(), "Ali Raza");
    }

    #[test]
    fn add_json_reads_camel_case_fields() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);

        let response = api.patient_add_json(
            r#"{"name":"Sara","age":29,"gender":"Female","disease":"Asthma","contactNumber":"0300"}"#,
        );
        assert!(response.ok, "{}", response.message);
        let patient = response.data.expect("patient payload");
        assert_eq!(patient.fields.contact_number, "0300");

        assert!(!api.patient_add_json("{broken").ok);
    }

    #[test]
    fn add_json_accepts_lowercase_gender() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);

        let response =
            api.patient_add_json(r#"{"name":"Sara","age":29,"gender":"male","disease":"Asthma"}"#);
        assert!(response.ok, "{}", response.message);
        let patient = response.data.expect("patient payload");
        assert_eq!(patient.fields.gender, Some(Gender::Male));
    }

    #[test]
    fn add_json_requires_gender() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);

        let response = api.patient_add_json(r#"{"name":"Sara","age":29,"disease":"Asthma"}"#);
        assert!(!response.ok);
        assert_eq!(response.message, "gender is required");
        assert!(api.patients_list().data.expect("list").patients.is_empty());
    }

    #[test]
    fn exhausted_id_space_is_reported_not_reused() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);

        assert!(api.patient_add_with_id(u32::MAX - 1, fields("Last Slot")).ok);
        let refused = api.patient_add(fields("One Too Many"));
        assert!(!refused.ok);
        assert_eq!(refused.message, "no patient ids left to issue");
        assert!(!api.sample_data_load().ok);
        assert_eq!(api.patients_list().data.expect("list").patients.len(), 1);
    }

    #[test]
    fn missing_patient_yields_failure_envelope() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);

        let response = api.patient_get(4242);
        assert!(!response.ok);
        assert_eq!(response.message, "patient with id 4242 not found");
        assert!(!api.patient_delete(4242).ok);
        assert!(!api.patient_update(4242, fields("Nobody")).ok);
    }

    #[test]
    fn queue_commands_report_positions_and_orphans() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);
        api.sample_data_load();

        let first = api.queue_add(1002).data.expect("queued");
        assert_eq!((first.position, first.queue_size), (1, 1));
        let second = api.queue_add(1004).data.expect("queued");
        assert_eq!((second.position, second.queue_size), (2, 2));
        assert!(!api.queue_add(1004).ok);

        assert!(api.patient_delete(1002).ok);
        let processed = api.queue_process().data.expect("processed");
        assert_eq!(processed.appointment.patient_id, 1002);
        assert!(!processed.record_exists);
        assert_eq!(processed.remaining_in_queue, 1);

        let waiting = api.queue_waiting_list().data.expect("waiting list");
        assert_eq!(waiting.waiting_list[0].position, 1);
        assert_eq!(api.queue_peek().data.map(|e| e.patient_id), Some(1004));

        assert!(api.queue_process().ok);
        assert!(!api.queue_process().ok);
        assert!(!api.queue_peek().ok);
    }

    #[test]
    fn recent_activities_use_default_count() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);
        for index in 0..12 {
            api.patient_add(fields(&format!("Patient {index}")));
        }

        let recent = api.activities_recent(None).data.expect("activities");
        assert_eq!(recent.count, 12);
        assert_eq!(recent.activities.len(), 10);
        assert_eq!(recent.activities[0].patient_name(), "Patient 11");

        let popped = api.activity_pop().data.expect("popped");
        assert_eq!(popped.action(), ActivityKind::Add);
        assert_eq!(api.activities_all().data.expect("all").count, 11);
    }

    #[test]
    fn blank_name_search_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);
        api.sample_data_load();

        assert!(!api.patients_search_by_name("   ").ok);
        let hits = api.patients_search_by_name("KHAN").data.expect("hits");
        assert_eq!(hits.count, 1);
        assert_eq!(hits.patients[0].patient_id, 1001);
    }

    #[test]
    fn save_clear_load_round_trip_through_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);
        api.sample_data_load();
        api.patient_delete(1003);

        let saved = api.snapshot_save().data.expect("saved");
        assert_eq!(saved.count, 4);
        let listing = api.patients_list().data.expect("list").patients;

        let fresh = api_in(&dir);
        let loaded = fresh.snapshot_load().data.expect("loaded");
        assert_eq!(loaded.count, 4);
        assert_eq!(fresh.patients_list().data.expect("list").patients, listing);
        assert_eq!(
            fresh.patient_add(fields("Next One")).data.map(|p| p.patient_id),
            Some(1006)
        );

        assert_eq!(api.data_clear().data, Some(4));
        assert!(!dir.path().join("snapshot.json").exists());
        let empty = api.snapshot_load().data.expect("missing file is a no-op");
        assert_eq!(empty.count, 0);
    }

    #[test]
    fn export_document_uses_camel_case_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let api = api_in(&dir);
        api.sample_data_load();
        api.queue_add(1001);

        let json = api.data_export().to_json().expect("serialize export");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse export");
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"]["patients"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["data"]["queue"][0]["patientId"], 1001);
        assert_eq!(value["data"]["statistics"]["totalPatients"], 5);
        assert!(value["data"]["exportedAt"].is_string());
    }
}
