//! API configuration

use std::time::Duration;

use serde::Deserialize;

use core_kernel::CoreError;
use infra_db::DatabaseConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Upper bound of pooled database connections
    pub max_connections: u32,
    /// Connections kept open when idle
    pub min_connections: u32,
    /// Seconds a request waits for a free database connection
    pub acquire_timeout_secs: u64,
    /// Deadline for inserting a patient, doctor or address, in seconds
    pub insert_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/records".to_string(),
            log_level: "info".to_string(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            insert_timeout_secs: 100,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("min_connections", i64::from(defaults.min_connections))?
            .set_default("acquire_timeout_secs", defaults.acquire_timeout_secs)?
            .set_default("insert_timeout_secs", defaults.insert_timeout_secs)?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Checks values that deserialize fine but cannot run
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.database_url.trim().is_empty() {
            return Err(CoreError::configuration("database_url must not be empty"));
        }
        if self.max_connections == 0 {
            return Err(CoreError::configuration("max_connections must be at least 1"));
        }
        if self.min_connections > self.max_connections {
            return Err(CoreError::configuration(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        if self.acquire_timeout_secs == 0 {
            return Err(CoreError::configuration("acquire_timeout_secs must be at least 1"));
        }
        if self.insert_timeout_secs == 0 {
            return Err(CoreError::configuration("insert_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the insert deadline
    pub fn insert_timeout(&self) -> Duration {
        Duration::from_secs(self.insert_timeout_secs)
    }

    /// Pool settings for the record store
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .with_pool_size(self.max_connections, self.min_connections)
            .with_acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.insert_timeout().as_secs(), 100);
    }

    #[test]
    fn test_inverted_pool_bounds_rejected() {
        let config = ApiConfig {
            min_connections: 20,
            ..ApiConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_connections"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ApiConfig {
            insert_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_pool_settings_follow_config() {
        let config = ApiConfig {
            database_url: "postgres://db/records".to_string(),
            max_connections: 6,
            min_connections: 1,
            acquire_timeout_secs: 4,
            ..ApiConfig::default()
        };
        let pool = config.database_config();

        assert_eq!(pool.url, "postgres://db/records");
        assert_eq!(pool.max_connections, 6);
        assert_eq!(pool.min_connections, 1);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(4));
    }
}
