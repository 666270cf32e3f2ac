//! Doctor DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_records::Doctor;

use super::{PersonRequest, PersonResponse};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDoctorRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub person: PersonRequest,
    #[validate(length(min = 1, max = 50))]
    pub license_number: String,
    #[validate(length(min = 1, max = 100))]
    pub specialization: String,
    #[validate(length(min = 1, max = 100))]
    pub qualification: String,
}

impl CreateDoctorRequest {
    pub fn into_doctor(self) -> Doctor {
        Doctor::new(
            self.person.into_person(),
            self.license_number,
            self.specialization,
            self.qualification,
        )
    }
}

/// New practice details; blank or missing values are rejected by the service
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDoctorRequest {
    pub specialization: Option<String>,
    pub qualification: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorResponse {
    #[serde(flatten)]
    pub person: PersonResponse,
    pub license_number: String,
    pub specialization: String,
    pub qualification: String,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            person: doctor.person.into(),
            license_number: doctor.license_number,
            specialization: doctor.specialization,
            qualification: doctor.qualification,
        }
    }
}
