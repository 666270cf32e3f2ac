//! Medical Records Domain
//!
//! This crate manages the subjects of the medical records system
//! (patients and doctors) and their postal addresses.
//!
//! # Subject Model
//!
//! Patients and doctors share one identity space. Both extend a common
//! `Person` keyed by a twelve digit national identity number:
//!
//! - **Patient**: a person plus an ailment and an optional occupation
//! - **Doctor**: a person plus a unique license number, specialization
//!   and qualification
//!
//! A subject saved without an identity number receives a generated one.
//! Addresses belong to exactly one subject and can only be created,
//! changed or removed while that subject exists. Removing a subject
//! leaves its addresses in place.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use domain_records::{Address, AddressService, FullName, Gender, MockRecordStore, Patient, PatientService, Person};
//!
//! let store = Arc::new(MockRecordStore::new());
//! let patients = PatientService::new(store.clone());
//! let addresses = AddressService::new(store);
//!
//! let person = Person::new(
//!     FullName::new("Priya", "Nair"),
//!     Gender::Female,
//!     NaiveDate::from_ymd_opt(1992, 4, 2).unwrap(),
//!     9_812_345_678,
//! );
//! let patient = patients.add_patient(Some(Patient::new(person, "Flu"))).await?;
//! let id = patient.adhaar_card_no().unwrap();
//!
//! let home = Address::new("14", "Temple Road", "Kochi", "Kerala", "682001");
//! addresses.add_address(id, Some(home)).await?;
//! ```

pub mod subject;
pub mod address;
pub mod identity;
pub mod error;
pub mod validation;
pub mod transaction;
pub mod ports;
pub mod services;

pub use subject::{Doctor, FullName, Gender, Patient, Person, Subject, SubjectKind};
pub use address::Address;
pub use identity::{AdhaarCardIdGenerator, IdentifierGenerator, MAX_GENERATION_ATTEMPTS};
pub use error::{ErrorKind, FieldError, RecordsError};
pub use validation::{AddressValidator, SubjectValidator, ValidationResult};
pub use transaction::{
    run_in_transaction, RollbackRule, TransactionBody, TransactionMode, TransactionPolicy,
    DEFAULT_INSERT_TIMEOUT,
};
pub use ports::{AddressStore, RecordStore, RecordTransaction, SubjectStore};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockRecordStore;
pub use services::{AddressService, DoctorService, PatientService};
