//! Application error taxonomy.
//!
//! Storage plumbing works in `anyhow::Result`; everything a user can trigger
//! (login, form submission, grid refresh) is reported as an [`AppError`] so
//! the caller can decide how to surface it. No variant is ever retried
//! automatically.

use thiserror::Error;

/// Input rejected before any store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required ({0} is missing)")]
    MissingField(&'static str),
    #[error("'{0}' is not a teaching day (Monday to Saturday)")]
    InvalidDay(String),
    #[error("Invalid {field} '{value}' (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },
    #[error("End time must be after start time")]
    EndNotAfterStart,
    #[error("Select a specific teacher before saving availability")]
    TeacherNotSelected,
    #[error("Semester must be at least 1")]
    InvalidSemester,
    #[error("Semester {semester} is outside the career's {max} semesters")]
    SemesterOutOfRange { semester: u32, max: u32 },
    #[error("Unknown role '{0}'")]
    UnknownRole(String),
    #[error("Hours {theoretical} + {practical} do not add up to a valid total")]
    InvalidHours { theoretical: u32, practical: u32 },
}

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("The email or password is incorrect.")]
    InvalidCredentials,
    #[error("An account with email {0} already exists")]
    EmailInUse(String),
    #[error("Error: {0}")]
    Provider(String),
}

/// Error returned by user-facing operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("No profile exists for authenticated user {uid}")]
    ProfileMissing { uid: String },

    #[error("Failed to load {what}: {cause:#}")]
    Fetch { what: String, cause: anyhow::Error },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save {what}: {cause:#}")]
    Mutation { what: String, cause: anyhow::Error },

    #[error("{collection} record {id} not found")]
    NotFound { collection: String, id: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(&'static str),
}

impl AppError {
    pub fn fetch(what: impl Into<String>, cause: anyhow::Error) -> Self {
        AppError::Fetch {
            what: what.into(),
            cause,
        }
    }

    pub fn mutation(what: impl Into<String>, cause: anyhow::Error) -> Self {
        AppError::Mutation {
            what: what.into(),
            cause,
        }
    }

    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        AppError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}
