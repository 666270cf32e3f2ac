//! Patient DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_records::Patient;

use super::{PersonRequest, PersonResponse};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePatientRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub person: PersonRequest,
    #[validate(length(min = 1, max = 100))]
    pub ailment: String,
    #[validate(length(max = 100))]
    pub occupation: Option<String>,
}

impl CreatePatientRequest {
    pub fn into_patient(self) -> Patient {
        Patient {
            person: self.person.into_person(),
            ailment: self.ailment,
            occupation: self.occupation,
        }
    }
}

/// New contact details; both are checked by the service
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatientRequest {
    #[serde(default)]
    pub contact_number: i64,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientResponse {
    #[serde(flatten)]
    pub person: PersonResponse,
    pub ailment: String,
    pub occupation: Option<String>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            person: patient.person.into(),
            ailment: patient.ailment,
            occupation: patient.occupation,
        }
    }
}
