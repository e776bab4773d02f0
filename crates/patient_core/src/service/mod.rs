//! Core use-case services.
//!
//! # Responsibility
//! - Coordinate store, index, queue and activity log behind one API.
//! - Keep command-surface callers decoupled from container details.

pub mod patient_manager;
pub mod sample_data;
pub mod snapshot;
