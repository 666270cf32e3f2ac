//! Core Kernel - Foundational types for the medical records system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Strongly-typed identifiers (national identity numbers, address keys)
//! - The adapter-neutral `PortError` and the port marker traits
//! - Core error types

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{AdhaarCardNo, AddressId, IdentifierError, ADHAAR_CARD_NO_LEN};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
