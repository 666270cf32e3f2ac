//! Records domain errors
//!
//! Every service operation fails with a `RecordsError`. Store failures
//! arrive as `PortError` and are converted with `?`; unique-key conflicts
//! and timeouts keep their own kinds so the boundary can report them
//! distinctly.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use core_kernel::PortError;

/// A single failing field found during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur in the records domain
#[derive(Debug, Error)]
pub enum RecordsError {
    /// A required input was absent
    #[error("{entity} must not be null")]
    NullInput { entity: &'static str },

    /// The requested record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The subject an address should belong to does not exist
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    /// One or more fields failed validation
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A unique key (identity number, email, license number) is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A bounded operation exceeded its deadline
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// The underlying store failed
    #[error(transparent)]
    Store(PortError),
}

/// Discriminant of `RecordsError`, used by rollback rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullInput,
    NotFound,
    SubjectNotFound,
    Validation,
    Conflict,
    Timeout,
    Store,
}

impl RecordsError {
    /// Creates a NullInput error
    pub fn null_input(entity: &'static str) -> Self {
        RecordsError::NullInput { entity }
    }

    /// Creates a NotFound error from any ID type
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        RecordsError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a SubjectNotFound error
    pub fn subject_not_found(id: impl fmt::Display) -> Self {
        RecordsError::SubjectNotFound(id.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordsError::NullInput { .. } => ErrorKind::NullInput,
            RecordsError::NotFound { .. } => ErrorKind::NotFound,
            RecordsError::SubjectNotFound(_) => ErrorKind::SubjectNotFound,
            RecordsError::Validation(_) => ErrorKind::Validation,
            RecordsError::Conflict(_) => ErrorKind::Conflict,
            RecordsError::Timeout { .. } => ErrorKind::Timeout,
            RecordsError::Store(_) => ErrorKind::Store,
        }
    }

    /// Returns true for both not-found kinds
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecordsError::NotFound { .. } | RecordsError::SubjectNotFound(_)
        )
    }
}

impl From<PortError> for RecordsError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Conflict { message } => RecordsError::Conflict(message),
            PortError::Validation { message, field } => RecordsError::Validation(vec![
                FieldError::new(field.unwrap_or_default(), message),
            ]),
            PortError::Timeout { duration_ms, .. } => RecordsError::Timeout {
                operation: "store",
                timeout_ms: duration_ms,
            },
            other => RecordsError::Store(other),
        }
    }
}
