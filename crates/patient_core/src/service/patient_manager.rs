//! Patient manager: the coordinator over store, index, queue and log.
//!
//! # Responsibility
//! - Sequence every mutation across the record store and the search index
//!   so the two never diverge.
//! - Append one activity entry after each successful operation.
//! - Own the monotonic id counter.
//!
//! # Invariants
//! - Write order is store -> index -> queue -> activity log.
//! - Delete removes the index entry before the store record, so no index
//!   handle ever outlives its record.
//! - An id is indexed iff the store holds it, and its handle resolves to
//!   that record's current fields (checked by `verify_consistency`).
//! - Queue entries are not invalidated when their record is deleted;
//!   `process_next` dequeues and logs orphans like any other entry.
//!
//! # Concurrency
//! - Single-threaded. Hosts that share a manager must guard the whole
//!   manager with one lock, never one lock per structure.

use crate::activity::activity_log::ActivityLog;
use crate::config::{ConfigError, ManagerConfig};
use crate::model::activity::{ActivityEntry, ActivityKind};
use crate::model::patient::{Gender, Patient, PatientFields, PatientId};
use crate::model::schedule::ScheduleEntry;
use crate::model::timestamp_label;
use crate::repo::record_store::RecordStore;
use crate::search::search_index::SearchIndex;
use crate::schedule::schedule_queue::ScheduleQueue;
use crate::service::sample_data::sample_patients;
use crate::service::snapshot::{Snapshot, SnapshotError};
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Failure kinds returned by manager operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// Explicit id is already held by another record.
    DuplicateId(PatientId),
    /// No record with this id.
    NotFound(PatientId),
    /// Record is already waiting in the schedule queue.
    AlreadyQueued(PatientId),
    /// Every id up to `PatientId::MAX` is taken or reserved.
    IdSpaceExhausted,
    /// Process/peek on an empty schedule queue.
    EmptyQueue,
    /// Pop on an empty activity log.
    EmptyLog,
    /// Snapshot rejected before restore.
    Snapshot(SnapshotError),
    /// Store and index disagree; indicates a bug, never user input.
    InconsistentState(&'static str),
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "patient id already exists: {id}"),
            Self::NotFound(id) => write!(f, "patient with id {id} not found"),
            Self::AlreadyQueued(id) => write!(f, "patient {id} is already in the queue"),
            Self::IdSpaceExhausted => write!(f, "no patient ids left to issue"),
            Self::EmptyQueue => write!(f, "no patients in queue"),
            Self::EmptyLog => write!(f, "no activities to undo"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent manager state: {details}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Snapshot(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SnapshotError> for ManagerError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// Per-gender record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenderDistribution {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

/// Point-in-time counters across all four structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_patients: usize,
    pub queue_size: usize,
    pub activity_count: usize,
    #[serde(rename = "bstHeight")]
    pub index_height: u32,
    #[serde(rename = "nextPatientId")]
    pub next_id: PatientId,
    pub gender_distribution: GenderDistribution,
}

/// Coordinator owning every container and the id counter.
#[derive(Debug)]
pub struct PatientManager {
    config: ManagerConfig,
    store: RecordStore,
    index: SearchIndex,
    queue: ScheduleQueue,
    activity: ActivityLog,
    next_id: PatientId,
}

impl Default for PatientManager {
    fn default() -> Self {
        Self::build(ManagerConfig::default())
    }
}

impl PatientManager {
    /// Creates a manager with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager after validating `config`.
    pub fn with_config(config: ManagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ManagerConfig) -> Self {
        Self {
            config,
            store: RecordStore::new(),
            index: SearchIndex::new(),
            queue: ScheduleQueue::new(),
            activity: ActivityLog::with_capacity(config.activity_capacity),
            next_id: config.id_base,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Next id `add_patient` will issue.
    pub fn next_id(&self) -> PatientId {
        self.next_id
    }

    /// Adds a record with an auto-issued id. Performs no field validation.
    ///
    /// # Errors
    /// - `IdSpaceExhausted` when the counter has no successor left.
    pub fn add_patient(&mut self, fields: PatientFields) -> ManagerResult<Patient> {
        let patient_id = self.next_id;
        let next_id = Self::successor(patient_id)?;
        let patient = self.insert_record(Patient::new(patient_id, fields))?;
        self.next_id = next_id;
        info!(
            "event=patient_add module=manager status=ok patient_id={} total={}",
            patient_id,
            self.store.len()
        );
        self.record(
            ActivityKind::Add,
            patient_id,
            patient.name(),
            "New patient registered",
        );
        Ok(patient)
    }

    /// Adds a record under a caller-chosen id.
    ///
    /// Fast-forwards the counter to `id + 1` when `id >= next_id`.
    ///
    /// # Errors
    /// - `DuplicateId` when `patient_id` is already held.
    /// - `IdSpaceExhausted` when `patient_id` would leave no next id.
    pub fn add_patient_with_id(
        &mut self,
        patient_id: PatientId,
        fields: PatientFields,
    ) -> ManagerResult<Patient> {
        if self.index.contains(patient_id) {
            debug!(
                "event=patient_add module=manager status=error error_code=duplicate_id patient_id={}",
                patient_id
            );
            return Err(ManagerError::DuplicateId(patient_id));
        }

        let next_id = if patient_id >= self.next_id {
            Self::successor(patient_id)?
        } else {
            self.next_id
        };
        let patient = self.insert_record(Patient::new(patient_id, fields))?;
        self.next_id = next_id;
        info!(
            "event=patient_add module=manager status=ok mode=explicit_id patient_id={} next_id={}",
            patient_id, self.next_id
        );
        self.record(
            ActivityKind::Add,
            patient_id,
            patient.name(),
            "Patient registered",
        );
        Ok(patient)
    }

    /// Looks a record up through the index and logs a VIEW entry.
    ///
    /// Failed lookups are not logged.
    pub fn search_patient(&mut self, patient_id: PatientId) -> ManagerResult<Patient> {
        let patient = self.resolve(patient_id)?.clone();
        debug!(
            "event=patient_view module=manager status=ok patient_id={}",
            patient_id
        );
        self.record(
            ActivityKind::View,
            patient_id,
            patient.name(),
            "Patient record viewed",
        );
        Ok(patient)
    }

    /// Index lookup without an activity entry.
    pub fn patient(&self, patient_id: PatientId) -> Option<&Patient> {
        self.resolve(patient_id).ok()
    }

    pub fn contains(&self, patient_id: PatientId) -> bool {
        self.index.contains(patient_id)
    }

    /// Deletes a record from index and store and returns it.
    ///
    /// Queue entries for the record are left in place (orphans).
    pub fn delete_patient(&mut self, patient_id: PatientId) -> ManagerResult<Patient> {
        let name = self.resolve(patient_id)?.name().to_string();

        self.index.remove(patient_id);
        let Some(removed) = self.store.take_by_id(patient_id) else {
            return Err(self.inconsistent(patient_id, "indexed patient missing from store"));
        };

        info!(
            "event=patient_delete module=manager status=ok patient_id={} total={} orphaned_in_queue={}",
            patient_id,
            self.store.len(),
            self.queue.is_queued(patient_id)
        );
        self.record(
            ActivityKind::Delete,
            patient_id,
            &name,
            "Patient record deleted",
        );
        Ok(removed)
    }

    /// Replaces every field of an existing record, keeping its id.
    pub fn update_patient(
        &mut self,
        patient_id: PatientId,
        fields: PatientFields,
    ) -> ManagerResult<Patient> {
        self.resolve(patient_id)?;

        if !self.store.update_by_id(patient_id, fields) {
            return Err(self.inconsistent(patient_id, "indexed patient missing from store"));
        }
        let Some(handle) = self.store.locate(patient_id) else {
            return Err(self.inconsistent(patient_id, "updated patient missing from store"));
        };
        self.index.update_reference(patient_id, handle);
        let Some(updated) = self.store.get(handle).cloned() else {
            return Err(self.inconsistent(patient_id, "updated patient handle is stale"));
        };

        info!(
            "event=patient_update module=manager status=ok patient_id={}",
            patient_id
        );
        self.record(
            ActivityKind::Update,
            patient_id,
            updated.name(),
            "Patient record updated",
        );
        Ok(updated)
    }

    /// Every record in store order (most recently inserted first).
    pub fn list_all(&self) -> Vec<Patient> {
        self.store.to_ordered_list()
    }

    /// Every record in ascending id order, via index traversal.
    pub fn list_sorted(&self) -> Vec<Patient> {
        self.index
            .inorder_handles()
            .into_iter()
            .filter_map(|handle| self.store.get(handle).cloned())
            .collect()
    }

    /// Case-insensitive substring match on names, in store order.
    ///
    /// Blank queries match nothing. Not logged.
    pub fn search_by_name(&self, query: &str) -> Vec<Patient> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.store
            .iter()
            .filter(|patient| patient.name().to_lowercase().contains(needle.as_str()))
            .cloned()
            .collect()
    }

    /// Queues an existing record and returns its entry (with position).
    ///
    /// # Errors
    /// - `NotFound` when the id is not indexed.
    /// - `AlreadyQueued` when an entry for the id is waiting.
    pub fn enqueue_for_schedule(&mut self, patient_id: PatientId) -> ManagerResult<ScheduleEntry> {
        let patient = self.resolve(patient_id)?;
        if self.queue.is_queued(patient_id) {
            return Err(ManagerError::AlreadyQueued(patient_id));
        }

        let mut entry = ScheduleEntry::new(
            patient_id,
            patient.name(),
            patient.fields.appointment_date.as_str(),
        );
        entry.position = self.queue.enqueue(entry.clone());

        info!(
            "event=queue_add module=manager status=ok patient_id={} position={}",
            patient_id, entry.position
        );
        self.record(
            ActivityKind::Queue,
            patient_id,
            &entry.patient_name,
            "Added to appointment queue",
        );
        Ok(entry)
    }

    /// Dequeues the front entry without re-validating its record.
    pub fn process_next(&mut self) -> ManagerResult<ScheduleEntry> {
        let entry = self.queue.dequeue().ok_or(ManagerError::EmptyQueue)?;
        info!(
            "event=queue_process module=manager status=ok patient_id={} remaining={} orphan={}",
            entry.patient_id,
            self.queue.len(),
            !self.index.contains(entry.patient_id)
        );
        self.record(
            ActivityKind::Process,
            entry.patient_id,
            &entry.patient_name,
            "Appointment processed",
        );
        Ok(entry)
    }

    pub fn peek_next(&self) -> ManagerResult<ScheduleEntry> {
        self.queue.peek_front().cloned().ok_or(ManagerError::EmptyQueue)
    }

    /// Queue entries front to rear.
    pub fn waiting_list(&self) -> Vec<ScheduleEntry> {
        self.queue.to_ordered_list()
    }

    pub fn queue_position(&self, patient_id: PatientId) -> Option<u32> {
        self.queue.position_of(patient_id)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// At most `count` entries, newest first.
    pub fn recent_activities(&self, count: usize) -> Vec<ActivityEntry> {
        self.activity.recent(count)
    }

    pub fn all_activities(&self) -> Vec<ActivityEntry> {
        self.activity.all()
    }

    pub fn last_activity(&self) -> Option<&ActivityEntry> {
        self.activity.peek()
    }

    /// Removes and returns the newest activity entry.
    pub fn pop_last_activity(&mut self) -> ManagerResult<ActivityEntry> {
        self.activity.pop().ok_or(ManagerError::EmptyLog)
    }

    pub fn activity_count(&self) -> usize {
        self.activity.len()
    }

    pub fn statistics(&self) -> Statistics {
        let mut gender_distribution = GenderDistribution::default();
        for patient in self.store.iter() {
            match patient.fields.gender {
                Some(Gender::Male) => gender_distribution.male += 1,
                Some(Gender::Female) => gender_distribution.female += 1,
                Some(Gender::Other) | None => gender_distribution.other += 1,
            }
        }

        Statistics {
            total_patients: self.store.len(),
            queue_size: self.queue.len(),
            activity_count: self.activity.len(),
            index_height: self.index.height(),
            next_id: self.next_id,
            gender_distribution,
        }
    }

    /// Adds the built-in demo patients with auto ids.
    ///
    /// Logs one SAMPLE entry instead of one ADD per record.
    ///
    /// # Errors
    /// - `IdSpaceExhausted` when the whole batch does not fit below the
    ///   id limit; nothing is added in that case.
    pub fn load_sample_data(&mut self) -> ManagerResult<Vec<Patient>> {
        let samples = sample_patients();
        let batch = PatientId::try_from(samples.len())
            .map_err(|_| ManagerError::IdSpaceExhausted)?;
        if self.next_id.checked_add(batch).is_none() {
            return Err(Self::exhausted(self.next_id));
        }

        let mut added = Vec::with_capacity(samples.len());
        for fields in samples {
            let patient_id = self.next_id;
            added.push(self.insert_record(Patient::new(patient_id, fields))?);
            self.next_id = Self::successor(patient_id)?;
        }

        info!(
            "event=sample_load module=manager status=ok count={} total={}",
            added.len(),
            self.store.len()
        );
        self.record_system(
            ActivityKind::Sample,
            format!("Loaded {} sample patients", added.len()),
        );
        Ok(added)
    }

    /// Empties store, index and queue and resets the counter.
    ///
    /// The activity log is kept and receives a CLEAR entry.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.store.len();
        self.index.clear();
        self.store.clear();
        self.queue.clear();
        self.next_id = self.config.id_base;

        info!(
            "event=data_clear module=manager status=ok removed={}",
            removed
        );
        self.record_system(ActivityKind::Clear, "All data cleared");
        removed
    }

    /// Captures records (store order) and the counter.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            patients: self.list_all(),
            next_id: self.next_id,
            saved_at: timestamp_label(),
        }
    }

    /// Replaces all records with the snapshot contents.
    ///
    /// The snapshot is validated first; on error nothing changes. The queue
    /// is emptied. The counter becomes the largest of the saved counter,
    /// `max id + 1` and the configured base.
    ///
    /// # Errors
    /// - `Snapshot` when ids are duplicated or reserved.
    /// - `IdSpaceExhausted` when the largest id has no successor.
    pub fn restore_snapshot(&mut self, snapshot: Snapshot) -> ManagerResult<usize> {
        if let Err(err) = snapshot.validate() {
            error!(
                "event=snapshot_restore module=manager status=error error_code=invalid_snapshot error={}",
                err
            );
            return Err(err.into());
        }

        let after_max = match snapshot.max_patient_id() {
            Some(max_id) => Self::successor(max_id)?,
            None => self.config.id_base,
        };
        let next_id = after_max.max(snapshot.next_id).max(self.config.id_base);

        self.index.clear();
        self.store.clear();
        self.queue.clear();

        let count = snapshot.patients.len();
        // Reverse so that the restored store lists records in snapshot order.
        for patient in snapshot.patients.into_iter().rev() {
            self.insert_record(patient)?;
        }
        self.next_id = next_id;

        info!(
            "event=snapshot_restore module=manager status=ok count={} next_id={}",
            count, self.next_id
        );
        self.record_system(
            ActivityKind::Load,
            format!("Loaded {count} patients from snapshot"),
        );
        Ok(count)
    }

    /// Cross-checks store and index.
    ///
    /// # Errors
    /// - `InconsistentState` describing the first divergence found.
    pub fn verify_consistency(&self) -> ManagerResult<()> {
        if self.store.len() != self.index.len() {
            return Err(ManagerError::InconsistentState(
                "store and index sizes differ",
            ));
        }

        for patient in self.store.iter() {
            let Some(handle) = self.index.search(patient.patient_id) else {
                return Err(ManagerError::InconsistentState(
                    "stored patient missing from index",
                ));
            };
            match self.store.get(handle) {
                Some(resolved) if resolved == patient => {}
                Some(_) => {
                    return Err(ManagerError::InconsistentState(
                        "index handle resolves to a different record",
                    ))
                }
                None => {
                    return Err(ManagerError::InconsistentState(
                        "index handle is stale",
                    ))
                }
            }
        }

        let ids = self.index.inorder_ids();
        if ids.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ManagerError::InconsistentState(
                "index traversal is not strictly ascending",
            ));
        }
        Ok(())
    }

    fn resolve(&self, patient_id: PatientId) -> ManagerResult<&Patient> {
        let handle = self
            .index
            .search(patient_id)
            .ok_or(ManagerError::NotFound(patient_id))?;
        self.store
            .get(handle)
            .ok_or_else(|| self.inconsistent(patient_id, "index handle is stale"))
    }

    /// Store first, then index. Returns a copy of the stored record.
    ///
    /// An id already in the index is rejected before the store is touched.
    fn insert_record(&mut self, patient: Patient) -> ManagerResult<Patient> {
        let patient_id = patient.patient_id;
        if self.index.contains(patient_id) {
            return Err(ManagerError::DuplicateId(patient_id));
        }

        let copy = patient.clone();
        let handle = self.store.insert_front(patient);
        if !self.index.insert(patient_id, handle) {
            self.store.take_by_id(patient_id);
            return Err(self.inconsistent(patient_id, "index rejected an unindexed id"));
        }
        Ok(copy)
    }

    fn successor(patient_id: PatientId) -> ManagerResult<PatientId> {
        patient_id
            .checked_add(1)
            .ok_or_else(|| Self::exhausted(patient_id))
    }

    fn exhausted(patient_id: PatientId) -> ManagerError {
        warn!(
            "event=id_issue module=manager status=error error_code=id_space_exhausted patient_id={}",
            patient_id
        );
        ManagerError::IdSpaceExhausted
    }

    fn inconsistent(&self, patient_id: PatientId, details: &'static str) -> ManagerError {
        error!(
            "event=consistency_check module=manager status=error patient_id={} details={}",
            patient_id, details
        );
        ManagerError::InconsistentState(details)
    }

    fn record(
        &mut self,
        kind: ActivityKind,
        patient_id: PatientId,
        patient_name: &str,
        details: &str,
    ) {
        self.push_activity(ActivityEntry::new(kind, patient_id, patient_name, details));
    }

    fn record_system(&mut self, kind: ActivityKind, details: impl Into<String>) {
        self.push_activity(ActivityEntry::system(kind, details));
    }

    fn push_activity(&mut self, entry: ActivityEntry) {
        let action = entry.action();
        if let Some(evicted) = self.activity.push(entry) {
            trace!(
                "event=activity_evict module=manager action={} evicted_action={}",
                action.as_str(),
                evicted.action().as_str()
            );
        }
    }
}
