//! Secondary lookup structures.
//!
//! # Responsibility
//! - Accelerate id lookup and provide id-ordered traversal.
//!
//! # Invariants
//! - Index entries never own record data.
//! - Index membership mirrors record-store membership at every quiescent
//!   point; only the manager mutates the index.

pub mod search_index;
