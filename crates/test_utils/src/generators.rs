//! Test Data Generators
//!
//! Provides proptest strategies that respect the record invariants, and
//! `fake`-backed helpers producing realistic one-off values.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use core_kernel::AdhaarCardNo;
use domain_records::{Address, FullName, Gender, Patient, Person};
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use proptest::prelude::*;

// ============================================================================
// Proptest strategies
// ============================================================================

/// Strategy for well-formed identity numbers
pub fn adhaar_card_no_strategy() -> impl Strategy<Value = AdhaarCardNo> {
    prop::array::uniform12(0u8..10).prop_map(|mut digits| {
        if digits[0] == 0 {
            digits[0] = 1;
        }
        AdhaarCardNo::from_digits(digits)
    })
}

/// Strategy for names accepted by the validators
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,50}"
}

/// Strategy for email addresses accepted by the validators
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z0-9._%+-]{1,20}", "[a-z0-9-]{1,20}", "[a-z]{2,6}")
        .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
}

/// Strategy for genders
pub fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

/// Strategy for past dates of birth
pub fn birth_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1930i32..2020i32, 1u32..=12u32, 1u32..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Strategy for contact numbers
pub fn contact_number_strategy() -> impl Strategy<Value = i64> {
    6_000_000_000i64..9_999_999_999i64
}

/// Strategy for valid patients without an identity number
pub fn patient_strategy() -> impl Strategy<Value = Patient> {
    (
        name_strategy(),
        name_strategy(),
        gender_strategy(),
        birth_date_strategy(),
        contact_number_strategy(),
        proptest::option::of(email_strategy()),
        "[A-Za-z ]{1,100}".prop_filter("ailment must not be blank", |s| !s.trim().is_empty()),
    )
        .prop_map(|(first, last, gender, dob, contact, email, ailment)| {
            let mut person = Person::new(FullName::new(first, last), gender, dob, contact);
            person.email = email;
            Patient::new(person, ailment)
        })
}

/// Strategy for valid addresses without id or owner
pub fn address_strategy() -> impl Strategy<Value = Address> {
    (
        "[0-9]{1,4}[A-Z]?",
        "[A-Za-z]{3,30}( Road| Street| Lane)",
        "[A-Za-z]{3,30}",
        "[A-Z]{2}",
        "[1-9][0-9]{5}",
    )
        .prop_map(|(house, street, city, state, zip)| Address::new(house, street, city, state, zip))
}

// ============================================================================
// Fake data
// ============================================================================

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn alphabetic_or(value: String, fallback: &str) -> String {
    let cleaned: String = value.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// A random full name that passes the alphabetic-only rule
pub fn fake_full_name() -> FullName {
    FullName::new(
        alphabetic_or(FirstName().fake(), "Kiran"),
        alphabetic_or(LastName().fake(), "Das"),
    )
}

/// A random email that is unique within the test process
pub fn fake_unique_email() -> String {
    let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let local = alphabetic_or(FirstName().fake(), "user").to_lowercase();
    format!("{}.{}@example.com", local, n)
}

/// A random, valid patient with a unique email
pub fn fake_patient() -> Patient {
    let contact_number: i64 = (6_000_000_000i64..9_999_999_999i64).fake();
    let person = Person::new(
        fake_full_name(),
        Gender::Other,
        NaiveDate::from_ymd_opt((1940..2010).fake(), (1..=12).fake(), (1..=28).fake())
            .unwrap_or_default(),
        contact_number,
    )
    .with_email(fake_unique_email());
    Patient::new(person, "Checkup")
}

/// A random, valid address without id or owner
pub fn fake_address() -> Address {
    let house: String = BuildingNumber().fake();
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let state: String = StateAbbr().fake();
    let zip: u32 = (100_000..999_999).fake();
    Address::new(house, street, city, state, zip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_records::{AddressValidator, SubjectValidator};

    proptest! {
        #[test]
        fn prop_generated_patients_are_valid(patient in patient_strategy()) {
            prop_assert!(SubjectValidator::validate_patient(&patient).is_valid());
        }

        #[test]
        fn prop_generated_addresses_are_valid(address in address_strategy()) {
            prop_assert!(AddressValidator::validate(&address).is_valid());
        }

        #[test]
        fn prop_generated_identifiers_parse(id in adhaar_card_no_strategy()) {
            prop_assert!(AdhaarCardNo::parse(id.as_str()).is_ok());
        }
    }

    #[test]
    fn test_fake_data_is_valid() {
        for _ in 0..20 {
            assert!(SubjectValidator::validate_patient(&fake_patient()).is_valid());
            assert!(AddressValidator::validate(&fake_address()).is_valid());
        }
    }

    #[test]
    fn test_fake_emails_are_unique() {
        assert_ne!(fake_unique_email(), fake_unique_email());
    }
}
