//! Waiting-list scheduling.
//!
//! # Invariants
//! - Entries refer to patients by id; deleting a record does not touch
//!   queued entries (orphans are dequeued like any other entry).

pub mod schedule_queue;
