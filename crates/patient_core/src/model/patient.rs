//! Patient domain model.
//!
//! # Responsibility
//! - Define the canonical patient record owned by the record store.
//! - Provide field validation for callers that accept external input.
//!
//! # Invariants
//! - `patient_id` is assigned once by the manager and never changes.
//! - Updates replace every field except `patient_id`.
//! - Wire shape uses camelCase keys (`patientId`, `contactNumber`, ...).

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier issued by the manager, unique within one store.
pub type PatientId = u32;

/// Highest accepted age for validated input.
pub const MAX_PATIENT_AGE: u32 = 150;

/// Minimum trimmed name length for validated input.
pub const MIN_NAME_CHARS: usize = 2;

/// Categorical gender field.
///
/// Deserializes from any label through [`Gender::from_label`]; unknown
/// labels collapse into `Other` so that statistics stay total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    /// Parses a free-form label (case-insensitive).
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

/// Absent, `null` and blank labels all read as "no gender given".
fn gender_label<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label
        .filter(|label| !label.trim().is_empty())
        .map(Gender::from))
}

/// Descriptive fields of one patient, everything except the identifier.
///
/// Used as the input shape of add/update operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientFields {
    pub name: String,
    pub age: u32,
    /// `None` when the caller gave no gender; rejected by `validate`.
    #[serde(deserialize_with = "gender_label")]
    pub gender: Option<Gender>,
    pub disease: String,
    pub contact_number: String,
    /// Scheduled appointment label, copied into schedule entries.
    pub appointment_date: String,
    pub visit_notes: String,
}

impl PatientFields {
    /// Convenience constructor for the required fields.
    ///
    /// Contact, appointment and notes start empty.
    pub fn new(
        name: impl Into<String>,
        age: u32,
        gender: Gender,
        disease: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender: Some(gender),
            disease: disease.into(),
            ..Self::default()
        }
    }

    pub fn with_contact_number(mut self, value: impl Into<String>) -> Self {
        self.contact_number = value.into();
        self
    }

    pub fn with_appointment_date(mut self, value: impl Into<String>) -> Self {
        self.appointment_date = value.into();
        self
    }

    pub fn with_visit_notes(mut self, value: impl Into<String>) -> Self {
        self.visit_notes = value.into();
        self
    }

    /// Validates caller-provided fields.
    ///
    /// The manager never calls this; command-surface callers do before
    /// add/update.
    ///
    /// # Errors
    /// - `NameTooShort` when the trimmed name has fewer than 2 chars.
    /// - `AgeOutOfRange` when `age > 150`.
    /// - `MissingGender` when no gender was given.
    /// - `MissingDisease` when `disease` is blank.
    pub fn validate(&self) -> Result<(), PatientValidationError> {
        if self.name.trim().chars().count() < MIN_NAME_CHARS {
            return Err(PatientValidationError::NameTooShort);
        }
        if self.age > MAX_PATIENT_AGE {
            return Err(PatientValidationError::AgeOutOfRange(self.age));
        }
        if self.gender.is_none() {
            return Err(PatientValidationError::MissingGender);
        }
        if self.disease.trim().is_empty() {
            return Err(PatientValidationError::MissingDisease);
        }
        Ok(())
    }

    /// Returns a copy with surrounding whitespace removed from the name.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.name.trim();
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        self
    }
}

/// Validation failure for external patient input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientValidationError {
    NameTooShort,
    AgeOutOfRange(u32),
    MissingGender,
    MissingDisease,
}

impl Display for PatientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameTooShort => {
                write!(f, "name is required (min {MIN_NAME_CHARS} characters)")
            }
            Self::AgeOutOfRange(age) => {
                write!(f, "age must be between 0 and {MAX_PATIENT_AGE}, got {age}")
            }
            Self::MissingGender => write!(f, "gender is required"),
            Self::MissingDisease => write!(f, "disease/condition is required"),
        }
    }
}

impl Error for PatientValidationError {}

/// Canonical patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: PatientId,
    #[serde(flatten)]
    pub fields: PatientFields,
}

impl Patient {
    pub fn new(patient_id: PatientId, fields: PatientFields) -> Self {
        Self { patient_id, fields }
    }

    pub fn name(&self) -> &str {
        self.fields.name.as_str()
    }

    /// Replaces every descriptive field; the identifier is untouched.
    pub fn replace_fields(&mut self, fields: PatientFields) {
        self.fields = fields;
    }
}
