//! Database Test Utilities
//!
//! Provides helpers for database testing including testcontainer management
//! and connection pooling for integration tests.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use infra_db::{create_pool, init_schema, DatabaseConfig, PostgresRecordStore};

/// Default PostgreSQL image tag for testing
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "records_test";

/// Tables holding record data, children first
const RECORD_TABLES: &[&str] = &["address", "patient", "doctor", "person"];

/// Error type returned by the database helpers
pub type TestDbError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    /// Creates the database connection URL
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A wrapper around a PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container for testing
    ///
    /// # Returns
    ///
    /// A new TestDatabase instance with the records schema applied
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or schema fails to initialize
    pub async fn new() -> Result<Self, TestDbError> {
        let container = Postgres::default()
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_db_name(POSTGRES_DB)
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            ..TestDatabaseConfig::default()
        };

        let pool = create_pool(
            DatabaseConfig::new(config.connection_url())
                .with_pool_size(5, 1)
                .with_acquire_timeout(Duration::from_secs(30)),
        )
        .await?;

        init_schema(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns a record store backed by this database
    pub fn record_store(&self) -> PostgresRecordStore {
        PostgresRecordStore::new(self.pool.clone())
    }

    /// Clears all record data while preserving the schema
    ///
    /// Address ids restart at 1.
    pub async fn clear_data(&self) -> Result<(), TestDbError> {
        let sql = format!(
            "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
            RECORD_TABLES.join(", ")
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

/// Global test database for shared integration tests
static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Gets or creates a shared test database instance
///
/// This function provides a singleton test database that can be shared
/// across multiple tests to reduce container startup overhead.
///
/// # Panics
///
/// Panics if the database fails to initialize
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to create shared test database"),
            )
        })
        .await
        .clone()
}

/// Creates an isolated test database for a single test
///
/// Use this when tests need to modify data and isolation is required
pub async fn create_isolated_test_database() -> Result<TestDatabase, TestDbError> {
    TestDatabase::new().await
}

/// Helper macro for running database tests
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        #[ignore = "requires Docker"]
        async fn $name() {
            let $db = $crate::database::create_isolated_test_database()
                .await
                .expect("Failed to create test database");
            $body
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let config = TestDatabaseConfig::default();
        let url = config.connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.contains(POSTGRES_DB));
    }

    #[test]
    fn test_clear_covers_every_record_table() {
        for table in ["person", "patient", "doctor", "address"] {
            assert!(RECORD_TABLES.contains(&table));
            assert!(infra_db::SCHEMA_SQL.contains(table));
        }
    }
}
