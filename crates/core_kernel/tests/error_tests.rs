//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::{AdhaarCardNo, PortError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Patient not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Patient not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_from_identifier_error() {
    let identifier_error = AdhaarCardNo::parse("abc").unwrap_err();
    let core_error: CoreError = identifier_error.into();

    assert!(matches!(core_error, CoreError::Identifier(_)));
    assert!(core_error.to_string().contains("12 digits"));
}

#[test]
fn test_port_error_validation_field() {
    let error = PortError::validation_field("must not be blank", "ailment");
    match error {
        PortError::Validation { message, field } => {
            assert_eq!(message, "must not be blank");
            assert_eq!(field.as_deref(), Some("ailment"));
        }
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_port_error_internal_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
    let error = PortError::internal_with_source("write failed", io);
    assert!(std::error::Error::source(&error).is_some());
}
