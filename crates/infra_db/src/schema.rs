//! Schema bootstrap
//!
//! The schema is a single idempotent SQL script; applying it to a database
//! that already has the tables is a no-op.

use sqlx::PgPool;
use tracing::info;

use crate::error::DatabaseError;

/// The records schema
pub const SCHEMA_SQL: &str = include_str!("../../../migrations/20240101_000001_initial_schema.sql");

/// Creates any missing tables and indexes
///
/// # Errors
///
/// Returns `DatabaseError::QueryFailed` if the script fails
pub async fn init_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("Records schema applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_every_table() {
        for table in ["person", "patient", "doctor", "address"] {
            assert!(SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)));
        }
    }

    #[test]
    fn test_address_owner_has_no_foreign_key() {
        let address_table = SCHEMA_SQL
            .split("CREATE TABLE IF NOT EXISTS address")
            .nth(1)
            .unwrap();
        assert!(!address_table.contains("REFERENCES"));
    }
}
