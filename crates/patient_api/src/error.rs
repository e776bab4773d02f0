//! Command-surface error type.

use patient_core::{ConfigError, ManagerError, PatientValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Caller input rejected before reaching the manager.
    Validation(PatientValidationError),
    /// Manager returned a tagged failure.
    Manager(ManagerError),
    Config(ConfigError),
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    /// Free-form request problem (e.g. blank search query).
    BadRequest(&'static str),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Manager(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            Self::BadRequest(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Manager(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::BadRequest(_) => None,
        }
    }
}

impl From<PatientValidationError> for ApiError {
    fn from(value: PatientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ManagerError> for ApiError {
    fn from(value: ManagerError) -> Self {
        Self::Manager(value)
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
