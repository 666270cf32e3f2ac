//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{AddressId, AdhaarCardNo};
use domain_records::{Address, Doctor, FullName, Gender, Patient, Person};

use crate::fixtures::DateFixtures;

/// Builder for the personal fields shared by patients and doctors
#[derive(Debug, Clone)]
pub struct PersonBuilder {
    adhaar_card_no: Option<AdhaarCardNo>,
    first_name: String,
    last_name: String,
    gender: Gender,
    date_of_birth: NaiveDate,
    contact_number: i64,
    email: Option<String>,
}

impl Default for PersonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            adhaar_card_no: None,
            first_name: "Nisha".to_string(),
            last_name: "Pillai".to_string(),
            gender: Gender::Female,
            date_of_birth: DateFixtures::adult_birth_date(),
            contact_number: 9_900_000_001,
            email: None,
        }
    }

    /// Sets the identity number
    pub fn with_adhaar_card_no(mut self, id: AdhaarCardNo) -> Self {
        self.adhaar_card_no = Some(id);
        self
    }

    /// Sets first and last name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the gender
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Sets the date of birth
    pub fn with_date_of_birth(mut self, date: NaiveDate) -> Self {
        self.date_of_birth = date;
        self
    }

    /// Sets the contact number
    pub fn with_contact_number(mut self, contact_number: i64) -> Self {
        self.contact_number = contact_number;
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builds the person
    pub fn build(self) -> Person {
        Person {
            adhaar_card_no: self.adhaar_card_no,
            full_name: FullName::new(self.first_name, self.last_name),
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            contact_number: self.contact_number,
            email: self.email,
        }
    }
}

/// Builder for constructing test patients
#[derive(Debug, Clone)]
pub struct PatientBuilder {
    person: PersonBuilder,
    ailment: String,
    occupation: Option<String>,
}

impl Default for PatientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            person: PersonBuilder::new(),
            ailment: "Diabetes".to_string(),
            occupation: None,
        }
    }

    /// Replaces the personal fields
    pub fn with_person(mut self, person: PersonBuilder) -> Self {
        self.person = person;
        self
    }

    /// Sets the identity number
    pub fn with_adhaar_card_no(mut self, id: AdhaarCardNo) -> Self {
        self.person = self.person.with_adhaar_card_no(id);
        self
    }

    /// Sets first and last name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.person = self.person.with_name(first, last);
        self
    }

    /// Sets the contact number
    pub fn with_contact_number(mut self, contact_number: i64) -> Self {
        self.person = self.person.with_contact_number(contact_number);
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.person = self.person.with_email(email);
        self
    }

    /// Sets the ailment
    pub fn with_ailment(mut self, ailment: impl Into<String>) -> Self {
        self.ailment = ailment.into();
        self
    }

    /// Sets the occupation
    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = Some(occupation.into());
        self
    }

    /// Builds the patient
    pub fn build(self) -> Patient {
        Patient {
            person: self.person.build(),
            ailment: self.ailment,
            occupation: self.occupation,
        }
    }
}

/// Builder for constructing test doctors
#[derive(Debug, Clone)]
pub struct DoctorBuilder {
    person: PersonBuilder,
    license_number: String,
    specialization: String,
    qualification: String,
}

impl Default for DoctorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DoctorBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            person: PersonBuilder::new()
                .with_name("Arjun", "Nair")
                .with_gender(Gender::Male)
                .with_date_of_birth(DateFixtures::senior_birth_date()),
            license_number: "TNMC-10001".to_string(),
            specialization: "Orthopaedics".to_string(),
            qualification: "MS".to_string(),
        }
    }

    /// Replaces the personal fields
    pub fn with_person(mut self, person: PersonBuilder) -> Self {
        self.person = person;
        self
    }

    /// Sets the identity number
    pub fn with_adhaar_card_no(mut self, id: AdhaarCardNo) -> Self {
        self.person = self.person.with_adhaar_card_no(id);
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.person = self.person.with_email(email);
        self
    }

    /// Sets the license number
    pub fn with_license_number(mut self, license: impl Into<String>) -> Self {
        self.license_number = license.into();
        self
    }

    /// Sets the specialization
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    /// Sets the qualification
    pub fn with_qualification(mut self, qualification: impl Into<String>) -> Self {
        self.qualification = qualification.into();
        self
    }

    /// Builds the doctor
    pub fn build(self) -> Doctor {
        Doctor {
            person: self.person.build(),
            license_number: self.license_number,
            specialization: self.specialization,
            qualification: self.qualification,
        }
    }
}

/// Builder for constructing test addresses
#[derive(Debug, Clone)]
pub struct AddressBuilder {
    id: Option<AddressId>,
    house_number: String,
    street_name: String,
    city: String,
    state: String,
    zip_code: String,
    owner: Option<AdhaarCardNo>,
}

impl Default for AddressBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            house_number: "18".to_string(),
            street_name: "Anna Salai".to_string(),
            city: "Chennai".to_string(),
            state: "TN".to_string(),
            zip_code: "600002".to_string(),
            owner: None,
        }
    }

    /// Sets the address id
    pub fn with_id(mut self, id: AddressId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the house number
    pub fn with_house_number(mut self, house_number: impl Into<String>) -> Self {
        self.house_number = house_number.into();
        self
    }

    /// Sets the street name
    pub fn with_street_name(mut self, street_name: impl Into<String>) -> Self {
        self.street_name = street_name.into();
        self
    }

    /// Sets the city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Sets the state
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Sets the zip code
    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = zip_code.into();
        self
    }

    /// Sets the owner
    pub fn owned_by(mut self, owner: AdhaarCardNo) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Builds the address
    pub fn build(self) -> Address {
        Address {
            id: self.id,
            house_number: self.house_number,
            street_name: self.street_name,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            owner: self.owner,
        }
    }
}
