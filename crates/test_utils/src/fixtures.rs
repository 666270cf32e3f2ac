//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the records system. These fixtures
//! are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{AddressId, AdhaarCardNo};
use domain_records::{Address, Doctor, FullName, Gender, Patient, Person};

/// Fixture for identity numbers
pub struct IdFixtures;

impl IdFixtures {
    /// A well-formed identity number
    pub fn adhaar_card_no() -> AdhaarCardNo {
        AdhaarCardNo::from_digits([4, 1, 2, 3, 5, 6, 7, 8, 9, 0, 1, 2])
    }

    /// A second well-formed identity number, distinct from the first
    pub fn other_adhaar_card_no() -> AdhaarCardNo {
        AdhaarCardNo::from_digits([9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 9, 8])
    }

    /// An identity number no fixture ever stores
    pub fn unknown_adhaar_card_no() -> AdhaarCardNo {
        AdhaarCardNo::from_digits([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1])
    }

    /// An address key no fixture ever stores
    pub fn unknown_address_id() -> AddressId {
        AddressId::new(999_999)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// Date of birth of an adult patient
    pub fn adult_birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1985, 3, 14).unwrap()
    }

    /// Date of birth of a senior doctor
    pub fn senior_birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1962, 8, 30).unwrap()
    }
}

/// Fixture for subjects
pub struct SubjectFixtures;

impl SubjectFixtures {
    /// A person with every optional field filled in
    pub fn person() -> Person {
        Person::new(
            FullName::new("Asha", "Menon"),
            Gender::Female,
            DateFixtures::adult_birth_date(),
            9_845_012_345,
        )
        .with_email("asha.menon@example.com")
    }

    /// A patient without an identity number
    pub fn patient() -> Patient {
        Patient::new(Self::person(), "Hypertension").with_occupation("Architect")
    }

    /// A doctor without an identity number
    pub fn doctor() -> Doctor {
        Doctor::new(
            Person::new(
                FullName::new("Rohan", "Kapoor"),
                Gender::Male,
                DateFixtures::senior_birth_date(),
                9_811_100_200,
            )
            .with_email("rohan.kapoor@hospital.in"),
            "DMC-55012",
            "Cardiology",
            "MD",
        )
    }
}

/// Fixture for addresses
pub struct AddressFixtures;

impl AddressFixtures {
    /// A complete address without owner or id
    pub fn home() -> Address {
        Address::new("221", "Residency Road", "Bengaluru", "KA", "560025")
    }

    /// A second complete address
    pub fn office() -> Address {
        Address::new("4A", "Nariman Point", "Mumbai", "MH", "400021")
    }

    /// An address with every field blank
    pub fn blank() -> Address {
        Address::new("", "", "", "", "")
    }
}
