//! Doctor handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::doctor::*;
use crate::dto::MessageResponse;
use crate::handlers::parse_adhaar_card_no;
use crate::{error::ApiError, AppState};

/// Registers a new doctor
pub async fn create_doctor(
    State(state): State<AppState>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<DoctorResponse>), ApiError> {
    request.validate()?;
    let saved = state.doctors.add_doctor(Some(request.into_doctor())).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Lists every doctor
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorResponse>>, ApiError> {
    let doctors = state.doctors.get_all_doctors().await?;
    Ok(Json(doctors.into_iter().map(Into::into).collect()))
}

/// Gets a doctor by identity number
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let id = parse_adhaar_card_no(&id)?;
    let doctor = state.doctors.get_doctor_by_id(&id).await?;
    Ok(Json(doctor.into()))
}

/// Gets the doctor holding an email address
pub async fn get_doctor_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let doctor = state.doctors.get_doctor_by_email(&email).await?;
    Ok(Json(doctor.into()))
}

/// Replaces a doctor's specialization and qualification
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let id = parse_adhaar_card_no(&id)?;
    let updated = state
        .doctors
        .update_doctor(&id, request.specialization, request.qualification)
        .await?;
    Ok(Json(updated.into()))
}

/// Deletes a doctor
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_adhaar_card_no(&id)?;
    if state.doctors.delete_doctor(&id).await? {
        Ok(Json(MessageResponse::new(format!(
            "Doctor deleted with identity number {}",
            id
        ))))
    } else {
        Err(ApiError::NotFound(format!(
            "Doctor not found with identity number {}",
            id
        )))
    }
}
