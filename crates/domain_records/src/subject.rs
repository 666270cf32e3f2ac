//! Subject model
//!
//! Patients and doctors share one identity space: both extend a common
//! `Person` carrying the national identity number and the personal fields.
//! A `Subject` is the tagged union over the two roles and is what the
//! subject store persists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::AdhaarCardNo;

/// Gender of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Returns the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// First and last name of a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    pub first_name: String,
    pub last_name: String,
}

impl FullName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// The identity and personal fields shared by every subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// National identity number; `None` until the store assigns one
    pub adhaar_card_no: Option<AdhaarCardNo>,
    pub full_name: FullName,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub contact_number: i64,
    pub email: Option<String>,
}

impl Person {
    /// Creates a person without an identity number or email
    pub fn new(
        full_name: FullName,
        gender: Gender,
        date_of_birth: NaiveDate,
        contact_number: i64,
    ) -> Self {
        Self {
            adhaar_card_no: None,
            full_name,
            gender,
            date_of_birth,
            contact_number,
            email: None,
        }
    }

    /// Sets a caller-supplied identity number
    pub fn with_adhaar_card_no(mut self, id: AdhaarCardNo) -> Self {
        self.adhaar_card_no = Some(id);
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A person receiving treatment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(flatten)]
    pub person: Person,
    pub ailment: String,
    pub occupation: Option<String>,
}

impl Patient {
    pub fn new(person: Person, ailment: impl Into<String>) -> Self {
        Self {
            person,
            ailment: ailment.into(),
            occupation: None,
        }
    }

    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = Some(occupation.into());
        self
    }

    /// Returns the identity number, if assigned
    pub fn adhaar_card_no(&self) -> Option<&AdhaarCardNo> {
        self.person.adhaar_card_no.as_ref()
    }
}

/// A licensed practitioner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(flatten)]
    pub person: Person,
    pub license_number: String,
    pub specialization: String,
    pub qualification: String,
}

impl Doctor {
    pub fn new(
        person: Person,
        license_number: impl Into<String>,
        specialization: impl Into<String>,
        qualification: impl Into<String>,
    ) -> Self {
        Self {
            person,
            license_number: license_number.into(),
            specialization: specialization.into(),
            qualification: qualification.into(),
        }
    }

    /// Returns the identity number, if assigned
    pub fn adhaar_card_no(&self) -> Option<&AdhaarCardNo> {
        self.person.adhaar_card_no.as_ref()
    }
}

/// Discriminator of the subject hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Patient,
    Doctor,
}

impl SubjectKind {
    /// Entity name used in errors and logs
    pub fn entity_name(&self) -> &'static str {
        match self {
            SubjectKind::Patient => "Patient",
            SubjectKind::Doctor => "Doctor",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// Any record keyed by a national identity number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    Patient(Patient),
    Doctor(Doctor),
}

impl Subject {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::Patient(_) => SubjectKind::Patient,
            Subject::Doctor(_) => SubjectKind::Doctor,
        }
    }

    pub fn person(&self) -> &Person {
        match self {
            Subject::Patient(p) => &p.person,
            Subject::Doctor(d) => &d.person,
        }
    }

    pub fn person_mut(&mut self) -> &mut Person {
        match self {
            Subject::Patient(p) => &mut p.person,
            Subject::Doctor(d) => &mut d.person,
        }
    }

    /// Returns the identity number, if assigned
    pub fn adhaar_card_no(&self) -> Option<&AdhaarCardNo> {
        self.person().adhaar_card_no.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.person().email.as_deref()
    }

    pub fn into_patient(self) -> Option<Patient> {
        match self {
            Subject::Patient(p) => Some(p),
            Subject::Doctor(_) => None,
        }
    }

    pub fn into_doctor(self) -> Option<Doctor> {
        match self {
            Subject::Doctor(d) => Some(d),
            Subject::Patient(_) => None,
        }
    }
}

impl From<Patient> for Subject {
    fn from(patient: Patient) -> Self {
        Subject::Patient(patient)
    }
}

impl From<Doctor> for Subject {
    fn from(doctor: Doctor) -> Self {
        Subject::Doctor(doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Person {
        Person::new(
            FullName::new("Asha", "Rao"),
            Gender::Female,
            NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
            9_876_543_210,
        )
    }

    #[test]
    fn test_gender_round_trip() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(gender.as_str().parse::<Gender>().unwrap(), gender);
        }
        assert!("Unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn test_subject_kind_and_conversion() {
        let subject = Subject::from(Patient::new(person(), "Flu"));
        assert_eq!(subject.kind(), SubjectKind::Patient);
        assert!(subject.clone().into_doctor().is_none());
        assert_eq!(subject.into_patient().unwrap().ailment, "Flu");
    }

    #[test]
    fn test_patient_serializes_flat() {
        let patient = Patient::new(person().with_email("asha@example.com"), "Flu");
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["full_name"]["first_name"], "Asha");
        assert_eq!(json["ailment"], "Flu");
        assert!(json.get("person").is_none());
    }

    #[test]
    fn test_full_name_display() {
        assert_eq!(FullName::new("Asha", "Rao").to_string(), "Asha Rao");
    }
}
