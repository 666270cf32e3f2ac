//! Application services over the record ports
//!
//! Each operation runs under its own `TransactionPolicy`: lookups in
//! read-only scopes, updates and deletes in read-write scopes, inserts
//! bounded by a timeout.

mod address;
mod doctor;
mod patient;

pub use address::AddressService;
pub use doctor::DoctorService;
pub use patient::PatientService;
