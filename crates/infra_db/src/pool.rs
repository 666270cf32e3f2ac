//! PostgreSQL pool setup
//!
//! A read-write unit of work holds one connection for its whole life, and
//! `Supports` units borrow one per call, so the pool must be able to hand
//! out at least one connection beyond those held by open transactions.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DatabaseError;

/// Settings for the record store's connection pool
///
/// # Example
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/records")
///     .with_pool_size(4, 1)
///     .with_acquire_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_connections, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Connections kept open while the service is idle
    pub min_connections: u32,
    /// How long a unit of work waits for a free connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the upper and lower bounds of the pool
    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.max_connections == 0 {
            return Err(DatabaseError::ConnectionFailed(
                "pool needs at least one connection".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(DatabaseError::ConnectionFailed(format!(
                "pool minimum {} exceeds maximum {}",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

/// Connects the pool the record store runs on
///
/// # Errors
///
/// `DatabaseError::ConnectionFailed` if the settings are inconsistent or
/// the database cannot be reached
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, DatabaseError> {
    config.check()?;
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
        "Connecting record store pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Record store pool ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_and_timeout() {
        let config = DatabaseConfig::new("postgres://test")
            .with_pool_size(5, 1)
            .with_acquire_timeout(Duration::from_secs(3));

        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_empty_pool_rejected() {
        let config = DatabaseConfig::new("postgres://test").with_pool_size(0, 0);
        assert!(config.check().unwrap_err().is_connection_error());
    }

    #[test]
    fn test_minimum_above_maximum_rejected() {
        let err = DatabaseConfig::new("postgres://test")
            .with_pool_size(2, 3)
            .check()
            .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn test_create_pool_checks_settings_before_connecting() {
        let result = create_pool(DatabaseConfig::new("postgres://unreachable/none").with_pool_size(1, 2)).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(m)) if m.contains("exceeds")));
    }
}
