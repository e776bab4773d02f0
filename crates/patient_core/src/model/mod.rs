//! Domain model for patient records and their satellite entries.
//!
//! # Responsibility
//! - Define the record owned by the store and the entries owned by the
//!   schedule queue and the activity log.
//! - Keep one serializable shape shared by core and command-surface callers.
//!
//! # Invariants
//! - Every record is identified by a stable `PatientId`.
//! - Schedule and activity entries refer to records by id only.

pub mod activity;
pub mod patient;
pub mod schedule;

/// Layout used for every human-readable timestamp label.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats the current local time with [`TIMESTAMP_FORMAT`].
pub fn timestamp_label() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
