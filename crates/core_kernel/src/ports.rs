//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the hexagonal
//! architecture used by the records domain.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │        (PatientService, DoctorService, AddressService)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Port Traits                             │
//! │   (RecordStore, RecordTransaction, SubjectStore, ...)        │
//! │   Defined in domain_records, depend only on core_kernel      │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  Postgres Adapter │     │  In-memory store │
//!         │    (infra_db)     │     │  (mock feature)  │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! Every adapter reports failures through `PortError`, so services can
//! handle errors the same way regardless of which store backs them.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data (unique key violation)
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error wrapping its cause
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::Timeout { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error is a unique-key conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and
/// usable behind `Arc<dyn ...>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Returns true if the adapter can serve requests
    pub fn is_available(&self) -> bool {
        !matches!(self.status, AdapterHealth::Unhealthy)
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Patient", "123456789012");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Patient"));
        assert!(error.to_string().contains("123456789012"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "save_subject".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());

        let conflict = PortError::conflict("duplicate email");
        assert!(conflict.is_conflict());
        assert!(!conflict.is_transient());
    }

    #[test]
    fn test_health_result_availability() {
        let result = HealthCheckResult {
            adapter_id: "test".to_string(),
            status: AdapterHealth::Degraded,
            latency_ms: 3,
            message: None,
            checked_at: chrono::Utc::now(),
        };
        assert!(result.is_available());
    }
}
