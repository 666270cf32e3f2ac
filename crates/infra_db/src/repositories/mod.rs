//! Repository implementations for record entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each table family. Repositories encapsulate SQL
//! queries and map between database rows and plain column structs.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Stateless; every method takes the connection to run on
//! - Runtime-checked queries with row types deriving `sqlx::FromRow`
//! - Multi-table writes wrapped in their own transaction or savepoint

pub mod subject;
pub mod address;

pub use subject::{SubjectRepository, SubjectRow, SubjectTable, NewSubject, NewPerson, NewRole};
pub use address::{AddressRepository, AddressRow, NewAddress};
