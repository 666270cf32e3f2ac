//! Request and response bodies

pub mod address;
pub mod doctor;
pub mod patient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_records::{FullName, Gender, Person};

/// Personal fields shared by patient and doctor requests
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PersonRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    #[validate(range(min = 1))]
    pub contact_number: i64,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
}

impl PersonRequest {
    pub fn into_person(self) -> Person {
        let person = Person::new(
            FullName::new(self.first_name, self.last_name),
            self.gender,
            self.date_of_birth,
            self.contact_number,
        );
        match self.email {
            Some(email) => person.with_email(email),
            None => person,
        }
    }
}

/// Personal fields as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonResponse {
    pub adhaar_card_no: Option<String>,
    pub full_name: FullName,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub contact_number: i64,
    pub email: Option<String>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            adhaar_card_no: person.adhaar_card_no.map(String::from),
            full_name: person.full_name,
            gender: person.gender,
            date_of_birth: person.date_of_birth,
            contact_number: person.contact_number,
            email: person.email,
        }
    }
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
