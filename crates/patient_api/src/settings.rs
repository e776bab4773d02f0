//! Process settings resolved from the environment.
//!
//! # Invariants
//! - Unparseable or out-of-range values fall back to defaults (and are
//!   logged); resolution never fails.

use log::warn;
use patient_core::{ManagerConfig, PatientId};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_ACTIVITY_CAPACITY: &str = "PATIENT_CORE_ACTIVITY_CAPACITY";
pub const ENV_ID_BASE: &str = "PATIENT_CORE_ID_BASE";
pub const ENV_DATA_PATH: &str = "PATIENT_CORE_DATA_PATH";

const DEFAULT_DATA_FILE_NAME: &str = "patient_core_snapshot.json";
/// Recent-activity count used when the caller passes none (or zero).
pub const DEFAULT_RECENT_ACTIVITY_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub manager: ManagerConfig,
    /// Snapshot file used by save/load/clear.
    pub data_path: PathBuf,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            manager: ManagerConfig::default(),
            data_path: std::env::temp_dir().join(DEFAULT_DATA_FILE_NAME),
        }
    }
}

impl ApiSettings {
    /// Settings for one snapshot file with default manager config.
    pub fn with_data_path(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Self::default()
        }
    }

    /// Reads `PATIENT_CORE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ApiSettings::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(capacity) = parse_var::<usize>(&lookup, ENV_ACTIVITY_CAPACITY) {
            if capacity > 0 {
                settings.manager.activity_capacity = capacity;
            } else {
                warn!("event=settings_resolve module=api status=ignored var={ENV_ACTIVITY_CAPACITY} reason=zero");
            }
        }
        if let Some(id_base) = parse_var::<PatientId>(&lookup, ENV_ID_BASE) {
            if id_base > 0 {
                settings.manager.id_base = id_base;
            } else {
                warn!("event=settings_resolve module=api status=ignored var={ENV_ID_BASE} reason=reserved");
            }
        }
        if let Some(raw) = lookup(ENV_DATA_PATH) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                settings.data_path = PathBuf::from(trimmed);
            }
        }
        settings
    }

    /// Normalizes a caller-provided recent-activity count.
    pub fn recent_count(&self, count: Option<usize>) -> usize {
        match count {
            None | Some(0) => DEFAULT_RECENT_ACTIVITY_COUNT,
            Some(value) => value.min(self.manager.activity_capacity),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("event=settings_resolve module=api status=ignored var={name} reason=unparseable");
            None
        }
    }
}
