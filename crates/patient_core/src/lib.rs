//! Core domain logic for the patient record store.
//! This crate is the single source of truth for record invariants.

pub mod activity;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod search;
pub mod service;

pub use activity::activity_log::{ActivityLog, DEFAULT_ACTIVITY_CAPACITY};
pub use config::{ConfigError, ManagerConfig, DEFAULT_ID_BASE};
pub use logging::{
    default_log_level, init_logging, logging_status, start_logging, LogSettings, LoggingError,
};
pub use model::activity::{ActivityEntry, ActivityKind};
pub use model::patient::{Gender, Patient, PatientFields, PatientId, PatientValidationError};
pub use model::schedule::ScheduleEntry;
pub use repo::record_store::{RecordHandle, RecordStore};
pub use schedule::schedule_queue::ScheduleQueue;
pub use search::search_index::SearchIndex;
pub use service::patient_manager::{
    GenderDistribution, ManagerError, ManagerResult, PatientManager, Statistics,
};
pub use service::snapshot::{Snapshot, SnapshotError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
