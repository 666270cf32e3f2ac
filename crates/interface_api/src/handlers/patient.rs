//! Patient handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::patient::*;
use crate::dto::MessageResponse;
use crate::handlers::parse_adhaar_card_no;
use crate::{error::ApiError, AppState};

/// Registers a new patient
pub async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    request.validate()?;
    let saved = state.patients.add_patient(Some(request.into_patient())).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Lists every patient
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let patients = state.patients.get_all_patients().await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

/// Gets a patient by identity number
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientResponse>, ApiError> {
    let id = parse_adhaar_card_no(&id)?;
    let patient = state.patients.get_patient_by_id(&id).await?;
    Ok(Json(patient.into()))
}

/// Lists patients sharing a contact number
pub async fn list_patients_by_contact_number(
    State(state): State<AppState>,
    Path(contact_number): Path<i64>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let patients = state
        .patients
        .get_patients_by_contact_number(contact_number)
        .await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

/// Gets the patient holding an email address
pub async fn get_patient_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<PatientResponse>, ApiError> {
    let patient = state.patients.get_patient_by_email(&email).await?;
    Ok(Json(patient.into()))
}

/// Replaces a patient's contact number and email
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    let id = parse_adhaar_card_no(&id)?;
    let updated = state
        .patients
        .update_patient(&id, request.contact_number, request.email)
        .await?;
    Ok(Json(updated.into()))
}

/// Deletes a patient
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_adhaar_card_no(&id)?;
    if state.patients.delete_patient(&id).await? {
        Ok(Json(MessageResponse::new(format!(
            "Patient deleted with identity number {}",
            id
        ))))
    } else {
        Err(ApiError::NotFound(format!(
            "Patient not found with identity number {}",
            id
        )))
    }
}
