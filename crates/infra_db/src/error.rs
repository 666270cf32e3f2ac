//! Database error types
//!
//! This module defines the error types that can occur during database operations,
//! providing meaningful error messages and proper error chaining.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
///
/// This enum captures all possible database-related errors, including
/// connection issues, query failures, and constraint violations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The identity number of a new person is already registered
    #[error("Duplicate identity number: {0}")]
    DuplicateIdentity(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A stored value could not be mapped back to the domain
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity (e.g., "Patient", "Address")
    /// * `id` - The identifier that was not found
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Patient", "123456789012");
    /// assert!(error.to_string().contains("Patient"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Creates a duplicate entry error
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity
    /// * `field` - The field that caused the duplicate
    /// * `value` - The duplicate value
    pub fn duplicate(entity: &str, field: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::DuplicateEntry(format!(
            "{} with {} '{}' already exists",
            entity, field, value
        ))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::DuplicateIdentity(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Classifies a unique violation by the constraint that fired
fn unique_violation(constraint: Option<&str>, message: String) -> DatabaseError {
    match constraint {
        Some("person_pkey") => {
            DatabaseError::DuplicateIdentity("identity number is already registered".to_string())
        }
        Some("person_email_key") => {
            DatabaseError::DuplicateEntry("email is already registered".to_string())
        }
        Some("doctor_license_number_key") => {
            DatabaseError::DuplicateEntry("license number is already registered".to_string())
        }
        _ => DatabaseError::DuplicateEntry(message),
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// This function analyzes the SQLx error and maps it to the appropriate
/// DatabaseError variant based on the PostgreSQL error code.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound("Record not found".to_string())
            }
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(ref db_err) => {
                // PostgreSQL error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23505") => unique_violation(db_err.constraint(), message),
                    Some("23503") => DatabaseError::ForeignKeyViolation(message),
                    Some("23514") => DatabaseError::ConstraintViolation(message),
                    Some("25006") => DatabaseError::TransactionFailed(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// Translates database errors into adapter-neutral port errors
///
/// - `DuplicateEntry`, `DuplicateIdentity` -> `PortError::Conflict`
/// - `NotFound` -> `PortError::NotFound`
/// - connection problems -> `PortError::Connection`
/// - check violations -> `PortError::Validation`
/// - everything else -> `PortError::Internal`
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::DuplicateEntry(message) | DatabaseError::DuplicateIdentity(message) => {
                PortError::conflict(message)
            }
            DatabaseError::NotFound(message) => PortError::NotFound {
                entity_type: "Record".to_string(),
                id: message,
            },
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => {
                PortError::Connection {
                    message: error.to_string(),
                    source: Some(Box::new(error)),
                }
            }
            DatabaseError::ConstraintViolation(message) => PortError::validation(message),
            other => PortError::internal_with_source(other.to_string(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let port: PortError = DatabaseError::duplicate("Doctor", "license_number", "L-1").into();
        assert!(port.is_conflict());
        assert!(port.to_string().contains("L-1"));
    }

    #[test]
    fn test_pool_exhaustion_is_transient() {
        let port: PortError = DatabaseError::PoolExhausted.into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_unique_violations_classified_by_constraint() {
        assert!(matches!(
            unique_violation(Some("person_pkey"), "raw".into()),
            DatabaseError::DuplicateIdentity(_)
        ));
        let email = unique_violation(Some("person_email_key"), "raw".into());
        assert_eq!(email.to_string(), "Duplicate entry: email is already registered");
        assert!(matches!(
            unique_violation(None, "raw".into()),
            DatabaseError::DuplicateEntry(m) if m == "raw"
        ));
    }

    #[test]
    fn test_identity_collision_is_conflict() {
        let port: PortError = DatabaseError::DuplicateIdentity("taken".into()).into();
        assert!(port.is_conflict());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(error.is_not_found());
    }
}
