//! Unit and property tests for the identifiers module
//!
//! Covers parsing, display and conversion of identity numbers and
//! address keys.

use core_kernel::{AdhaarCardNo, AddressId, IdentifierError, ADHAAR_CARD_NO_LEN};
use proptest::prelude::*;

mod adhaar_card_no_tests {
    use super::*;

    #[test]
    fn test_parse_accepts_twelve_digits() {
        let id = AdhaarCardNo::parse("987654321098").unwrap();
        assert_eq!(id.as_str(), "987654321098");
    }

    #[test]
    fn test_leading_zeros_are_preserved() {
        let id: AdhaarCardNo = "000123456789".parse().unwrap();
        assert_eq!(id.to_string(), "000123456789");
    }

    #[test]
    fn test_thirteen_digits_rejected() {
        let err = AdhaarCardNo::parse("1234567890123").unwrap_err();
        assert_eq!(
            err,
            IdentifierError::InvalidLength { expected: ADHAAR_CARD_NO_LEN, actual: 13 }
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert!(AdhaarCardNo::parse("").is_err());
    }

    #[test]
    fn test_whitespace_rejected() {
        assert!(matches!(
            AdhaarCardNo::parse("12345 789012"),
            Err(IdentifierError::NonNumeric(_))
        ));
    }

    #[test]
    fn test_string_round_trip() {
        let id = AdhaarCardNo::parse("555555555555").unwrap();
        let raw: String = id.clone().into();
        assert_eq!(AdhaarCardNo::try_from(raw).unwrap(), id);
    }
}

mod address_id_tests {
    use super::*;

    #[test]
    fn test_display_is_raw_number() {
        assert_eq!(AddressId::new(17).to_string(), "17");
    }

    #[test]
    fn test_i64_conversion() {
        let id = AddressId::from(99);
        let raw: i64 = id.into();
        assert_eq!(raw, 99);
    }
}

proptest! {
    #[test]
    fn prop_any_twelve_digit_string_parses(digits in "[0-9]{12}") {
        let id = AdhaarCardNo::parse(digits.clone()).unwrap();
        prop_assert_eq!(id.as_str(), digits.as_str());
    }

    #[test]
    fn prop_wrong_length_never_parses(digits in "[0-9]{0,11}|[0-9]{13,20}") {
        prop_assert!(AdhaarCardNo::parse(digits).is_err());
    }
}
