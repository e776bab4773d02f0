//! Bounded audit trail of manager operations.

pub mod activity_log;
