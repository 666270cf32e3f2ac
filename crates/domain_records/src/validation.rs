//! Subject and address validation rules
//!
//! Services validate every record before touching the store. Validators
//! collect all failing fields rather than stopping at the first.
//!
//! # Validation Rules
//!
//! ## Persons
//! - First and last name required, letters only, at most 50 characters
//! - Date of birth must not be in the future
//! - Email optional; when present it must look like an address and fit
//!   in 150 characters
//!
//! ## Patients
//! - Ailment required; ailment and occupation at most 100 characters
//!
//! ## Doctors
//! - License number required, at most 50 characters
//! - Specialization and qualification required, at most 100 characters
//!
//! ## Addresses
//! - House number, street, city, state and zip code all required and
//!   within their column widths

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::address::Address;
use crate::error::{FieldError, RecordsError};
use crate::subject::{Doctor, Patient, Person};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("valid email regex")
});

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+$").expect("valid name regex")
});

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 150;
pub const MAX_AILMENT_LEN: usize = 100;
pub const MAX_OCCUPATION_LEN: usize = 100;
pub const MAX_LICENSE_LEN: usize = 50;
pub const MAX_SPECIALIZATION_LEN: usize = 100;
pub const MAX_QUALIFICATION_LEN: usize = 100;
pub const MAX_HOUSE_NUMBER_LEN: usize = 10;
pub const MAX_STREET_LEN: usize = 100;
pub const MAX_CITY_LEN: usize = 50;
pub const MAX_STATE_LEN: usize = 50;
pub const MAX_ZIP_LEN: usize = 10;

/// Result of record validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of failing fields
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Converts into `Err(RecordsError::Validation)` when any field failed
    pub fn into_result(self) -> Result<(), RecordsError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(RecordsError::Validation(self.errors))
        }
    }

    fn required(&mut self, field: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.add_error(field, "must not be blank");
        } else {
            self.max_len(field, value, max_len);
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.add_error(field, format!("must be at most {} characters", max_len));
        }
    }
}

/// Returns true if `email` matches the accepted address pattern
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Returns true if `name` is non-empty and letters only
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Validator for patients, doctors and their shared person fields
pub struct SubjectValidator;

impl SubjectValidator {
    /// Validates the fields shared by every subject
    pub fn validate_person(person: &Person) -> ValidationResult {
        let mut result = ValidationResult::ok();

        Self::validate_name(&mut result, "first_name", &person.full_name.first_name);
        Self::validate_name(&mut result, "last_name", &person.full_name.last_name);

        let today = Utc::now().date_naive();
        Self::validate_date_of_birth(&mut result, person.date_of_birth, today);

        if let Some(ref email) = person.email {
            result.merge(Self::validate_email(email));
        }

        result
    }

    /// Validates a patient
    pub fn validate_patient(patient: &Patient) -> ValidationResult {
        let mut result = Self::validate_person(&patient.person);
        result.required("ailment", &patient.ailment, MAX_AILMENT_LEN);
        if let Some(ref occupation) = patient.occupation {
            result.max_len("occupation", occupation, MAX_OCCUPATION_LEN);
        }
        result
    }

    /// Validates a doctor
    pub fn validate_doctor(doctor: &Doctor) -> ValidationResult {
        let mut result = Self::validate_person(&doctor.person);
        result.required("license_number", &doctor.license_number, MAX_LICENSE_LEN);
        result.merge(Self::validate_practice(&doctor.specialization, &doctor.qualification));
        result
    }

    /// Validates the fields a doctor update may change
    pub fn validate_practice(specialization: &str, qualification: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();
        result.required("specialization", specialization, MAX_SPECIALIZATION_LEN);
        result.required("qualification", qualification, MAX_QUALIFICATION_LEN);
        result
    }

    /// Validates an email address
    pub fn validate_email(email: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if email.chars().count() > MAX_EMAIL_LEN {
            result.add_error("email", format!("must be at most {} characters", MAX_EMAIL_LEN));
        } else if !is_valid_email(email) {
            result.add_error("email", "is not a valid email address");
        }
        result
    }

    fn validate_name(result: &mut ValidationResult, field: &str, value: &str) {
        if value.trim().is_empty() {
            result.add_error(field, "must not be blank");
        } else if !is_valid_name(value) {
            result.add_error(field, "must contain only letters");
        } else {
            result.max_len(field, value, MAX_NAME_LEN);
        }
    }

    fn validate_date_of_birth(result: &mut ValidationResult, dob: NaiveDate, today: NaiveDate) {
        if dob > today {
            result.add_error("date_of_birth", "cannot be in the future");
        }
    }
}

/// Validator for addresses
pub struct AddressValidator;

impl AddressValidator {
    pub fn validate(address: &Address) -> ValidationResult {
        let mut result = ValidationResult::ok();
        result.required("house_number", &address.house_number, MAX_HOUSE_NUMBER_LEN);
        result.required("street_name", &address.street_name, MAX_STREET_LEN);
        result.required("city", &address.city, MAX_CITY_LEN);
        result.required("state", &address.state, MAX_STATE_LEN);
        result.required("zip_code", &address.zip_code, MAX_ZIP_LEN);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{FullName, Gender};

    fn person(first: &str, last: &str) -> Person {
        Person::new(
            FullName::new(first, last),
            Gender::Male,
            NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
            5550100,
        )
    }

    #[test]
    fn test_valid_patient() {
        let patient = Patient::new(person("Ravi", "Kumar").with_email("ravi@example.in"), "Flu");
        assert!(SubjectValidator::validate_patient(&patient).is_valid());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let patient = Patient::new(person("R4vi", "").with_email("not-an-email"), " ");
        let result = SubjectValidator::validate_patient(&patient);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "last_name", "email", "ailment"]);
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut p = person("Ravi", "Kumar");
        p.date_of_birth = Utc::now().date_naive() + chrono::Days::new(2);
        let result = SubjectValidator::validate_person(&p);
        assert_eq!(result.errors[0].field, "date_of_birth");
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a.b+c@mail.example.com"));
        assert!(!is_valid_email("x@y"));
        assert!(!is_valid_email("x@y.toolongtld"));
        assert!(!is_valid_email("has space@y.com"));
    }

    #[test]
    fn test_doctor_requires_license() {
        let doctor = Doctor::new(person("Meera", "Iyer"), "", "Cardiology", "MD");
        let result = SubjectValidator::validate_doctor(&doctor);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "license_number");
    }

    #[test]
    fn test_address_column_limits() {
        let address = Address::new("12345678901", "Main", "Pune", "MH", "411001");
        let err = AddressValidator::validate(&address).into_result().unwrap_err();
        match err {
            RecordsError::Validation(errors) => assert_eq!(errors[0].field, "house_number"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
