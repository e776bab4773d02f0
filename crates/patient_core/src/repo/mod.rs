//! Primary storage for patient records.
//!
//! # Responsibility
//! - Own record data and expose scan-based CRUD over it.
//! - Issue handles that secondary structures can hold without borrowing.
//!
//! # Invariants
//! - The store is the single source of truth for record existence.
//! - Only the manager mutates the store.

pub mod record_store;
