//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! The record store adapter:
//! - Implements the records domain's store and transaction ports
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresRecordStore;
//! use domain_records::{RecordStore, TransactionMode};
//!
//! let store = PostgresRecordStore::new(pool);
//! let mut tx = store.begin(TransactionMode::ReadOnly).await?;
//! let subject = tx.find_subject(&id).await?;
//! ```

pub mod record_store;

pub use record_store::{PgRecordTransaction, PostgresRecordStore};
