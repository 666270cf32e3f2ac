//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for record types that give
//! more meaningful error messages than standard assertions.

use core_kernel::AdhaarCardNo;
use domain_records::{Address, ErrorKind, Patient, RecordsError};

/// Asserts that a result failed with the given error kind
///
/// # Panics
///
/// Panics if the result is `Ok` or fails with a different kind
pub fn assert_error_kind<T: std::fmt::Debug>(result: &Result<T, RecordsError>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok({:?})", expected, value),
        Err(err) => assert_eq!(
            err.kind(),
            expected,
            "Expected {:?} error, got {:?}: {}",
            expected,
            err.kind(),
            err
        ),
    }
}

/// Asserts that a validation error names `field` among its failures
pub fn assert_validation_mentions<T: std::fmt::Debug>(result: &Result<T, RecordsError>, field: &str) {
    match result {
        Err(RecordsError::Validation(errors)) => assert!(
            errors.iter().any(|e| e.field == field),
            "Expected a validation error on '{}', got {:?}",
            field,
            errors
        ),
        other => panic!("Expected a validation error on '{}', got {:?}", field, other),
    }
}

/// Asserts that a stored patient carries an assigned identity number
///
/// # Returns
///
/// The assigned identity number
pub fn assert_has_identity(patient: &Patient) -> AdhaarCardNo {
    let id = patient
        .adhaar_card_no()
        .unwrap_or_else(|| panic!("Expected an assigned identity number on {:?}", patient.person.full_name))
        .clone();
    assert_eq!(id.as_str().len(), 12, "Identity number must have 12 digits: {}", id);
    id
}

/// Asserts that two patients hold the same stored fields
pub fn assert_same_patient(actual: &Patient, expected: &Patient) {
    assert_eq!(
        actual.person, expected.person,
        "Personal fields differ for {}",
        expected.person.full_name
    );
    assert_eq!(actual.ailment, expected.ailment, "Ailment differs");
    assert_eq!(actual.occupation, expected.occupation, "Occupation differs");
}

/// Asserts that an address is stored and belongs to `owner`
pub fn assert_address_owned_by(address: &Address, owner: &AdhaarCardNo) {
    assert!(address.id.is_some(), "Expected a stored address, got {:?}", address);
    assert!(
        address.is_owned_by(owner),
        "Expected address owned by {}, got {:?}",
        owner,
        address.owner
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_records::FieldError;

    #[test]
    fn test_assert_error_kind() {
        let result: Result<(), RecordsError> = Err(RecordsError::null_input("Patient"));
        assert_error_kind(&result, ErrorKind::NullInput);
    }

    #[test]
    #[should_panic(expected = "Expected NotFound error")]
    fn test_assert_error_kind_rejects_ok() {
        let result: Result<u8, RecordsError> = Ok(1);
        assert_error_kind(&result, ErrorKind::NotFound);
    }

    #[test]
    fn test_assert_validation_mentions() {
        let result: Result<(), RecordsError> =
            Err(RecordsError::Validation(vec![FieldError::new("city", "must not be blank")]));
        assert_validation_mentions(&result, "city");
    }
}
