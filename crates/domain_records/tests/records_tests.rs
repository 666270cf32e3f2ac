//! Tests for the records model, identity generation and validation

use chrono::NaiveDate;
use proptest::prelude::*;

use core_kernel::AdhaarCardNo;
use domain_records::validation::{is_valid_email, is_valid_name, MAX_NAME_LEN};
use domain_records::{
    Address, AddressValidator, AdhaarCardIdGenerator, Doctor, FullName, Gender,
    IdentifierGenerator, Patient, Person, RecordsError, Subject, SubjectKind, SubjectValidator,
};

fn person() -> Person {
    Person::new(
        FullName::new("Sunita", "Verma"),
        Gender::Female,
        NaiveDate::from_ymd_opt(1979, 11, 5).unwrap(),
        9_900_112_233,
    )
}

// ============================================================================
// Model Tests
// ============================================================================

mod model_tests {
    use super::*;

    #[test]
    fn test_subject_shares_person_accessors() {
        let doctor = Doctor::new(person().with_email("s.verma@clinic.in"), "MCI-42", "ENT", "MS");
        let subject = Subject::from(doctor);

        assert_eq!(subject.kind(), SubjectKind::Doctor);
        assert_eq!(subject.email(), Some("s.verma@clinic.in"));
        assert!(subject.adhaar_card_no().is_none());
    }

    #[test]
    fn test_subject_json_carries_kind() {
        let subject = Subject::from(Patient::new(person(), "Migraine").with_occupation("Librarian"));
        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["kind"], "patient");
        assert_eq!(json["occupation"], "Librarian");

        let back: Subject = serde_json::from_value(json).unwrap();
        assert_eq!(back, subject);
    }

    #[test]
    fn test_person_with_identifier() {
        let id = AdhaarCardNo::parse("246824682468").unwrap();
        let p = person().with_adhaar_card_no(id.clone());
        assert_eq!(Patient::new(p, "Flu").adhaar_card_no(), Some(&id));
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_long_names_rejected() {
        let mut p = person();
        p.full_name.first_name = "A".repeat(MAX_NAME_LEN + 1);
        let result = SubjectValidator::validate_person(&p);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "first_name");
    }

    #[test]
    fn test_occupation_is_optional() {
        let patient = Patient::new(person(), "Flu");
        assert!(SubjectValidator::validate_patient(&patient).is_valid());
    }

    #[test]
    fn test_address_reports_every_blank_field() {
        let address = Address::new("", "", "", "", "");
        let err = AddressValidator::validate(&address).into_result().unwrap_err();
        match err {
            RecordsError::Validation(errors) => assert_eq!(errors.len(), 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_names_with_digits_or_spaces_rejected() {
        assert!(is_valid_name("Sunita"));
        assert!(!is_valid_name("Sun1ta"));
        assert!(!is_valid_name("Mary Ann"));
        assert!(!is_valid_name(""));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_generated_identifiers_are_twelve_digits(_seed in 0u32..500) {
        let id = AdhaarCardIdGenerator::new().generate(None);
        prop_assert_eq!(id.as_str().len(), 12);
        prop_assert!(AdhaarCardNo::parse(id.as_str()).is_ok());
    }

    #[test]
    fn prop_simple_addresses_are_valid_emails(
        local in "[a-z0-9._%+-]{1,20}",
        domain in "[a-z0-9-]{1,20}",
        tld in "[a-z]{2,6}",
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email));
    }

    #[test]
    fn prop_emails_without_at_sign_rejected(s in "[a-z0-9.]{1,40}") {
        prop_assert!(!is_valid_email(&s));
    }
}
