//! Manager configuration.
//!
//! # Invariants
//! - `id_base >= 1`; id `0` is reserved for system activity entries.
//! - `activity_capacity >= 1`.

use crate::activity::activity_log::DEFAULT_ACTIVITY_CAPACITY;
use crate::model::patient::PatientId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First identifier issued by a fresh (or cleared) manager.
pub const DEFAULT_ID_BASE: PatientId = 1001;

/// Tunables for one `PatientManager` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// First auto-issued patient id; also the counter value after clear.
    pub id_base: PatientId,
    /// Maximum retained activity entries.
    pub activity_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            id_base: DEFAULT_ID_BASE,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

impl ManagerConfig {
    /// Checks field ranges.
    ///
    /// # Errors
    /// - `ReservedIdBase` when `id_base == 0`.
    /// - `ZeroActivityCapacity` when `activity_capacity == 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id_base == 0 {
            return Err(ConfigError::ReservedIdBase);
        }
        if self.activity_capacity == 0 {
            return Err(ConfigError::ZeroActivityCapacity);
        }
        Ok(())
    }
}

/// Rejected manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ReservedIdBase,
    ZeroActivityCapacity,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReservedIdBase => write!(f, "id_base must be >= 1 (0 is reserved)"),
            Self::ZeroActivityCapacity => write!(f, "activity_capacity must be >= 1"),
        }
    }
}

impl Error for ConfigError {}
