//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the medical records
//! system using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories hold the SQL for
//! one table family and run on whatever connection they are handed, so the
//! same queries serve pooled connections and open transactions alike. The
//! `PostgresRecordStore` adapter implements the domain's record ports on
//! top of them.
//!
//! # Storage Layout
//!
//! - `person`: identity and personal fields shared by every subject
//! - `patient` / `doctor`: role extensions keyed by the same identity number
//! - `address`: postal addresses, linked to their owner by identity number
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, init_schema, DatabaseConfig, PostgresRecordStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/records")).await?;
//! init_schema(&pool).await?;
//! let store = PostgresRecordStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use schema::{init_schema, SCHEMA_SQL};
pub use adapters::PostgresRecordStore;
