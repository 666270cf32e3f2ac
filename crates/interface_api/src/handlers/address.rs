//! Address handlers
//!
//! Every route is scoped to the owning subject's identity number.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use core_kernel::AddressId;

use crate::dto::address::*;
use crate::dto::MessageResponse;
use crate::handlers::parse_adhaar_card_no;
use crate::{error::ApiError, AppState};

/// Adds an address to a subject
pub async fn create_address(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(request): Json<AddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>), ApiError> {
    let owner = parse_adhaar_card_no(&owner)?;
    let saved = state
        .addresses
        .add_address(&owner, Some(request.into()))
        .await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Lists a subject's addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<AddressResponse>>, ApiError> {
    let owner = parse_adhaar_card_no(&owner)?;
    let addresses = state.addresses.get_all_addresses(&owner).await?;
    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}

/// Gets one of a subject's addresses
pub async fn get_address(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, i64)>,
) -> Result<Json<AddressResponse>, ApiError> {
    let owner = parse_adhaar_card_no(&owner)?;
    let address = state
        .addresses
        .get_address_by_id(&owner, AddressId::new(id))
        .await?;
    Ok(Json(address.into()))
}

/// Overwrites one of a subject's addresses
pub async fn update_address(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, i64)>,
    Json(request): Json<AddressRequest>,
) -> Result<Json<AddressResponse>, ApiError> {
    let owner = parse_adhaar_card_no(&owner)?;
    let updated = state
        .addresses
        .update_address(&owner, AddressId::new(id), Some(request.into()))
        .await?;
    Ok(Json(updated.into()))
}

/// Deletes one of a subject's addresses
pub async fn delete_address(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let owner = parse_adhaar_card_no(&owner)?;
    if state
        .addresses
        .delete_address(&owner, AddressId::new(id))
        .await?
    {
        Ok(Json(MessageResponse::new(format!("Address {} deleted", id))))
    } else {
        Err(ApiError::NotFound(format!(
            "Address {} not found for identity number {}",
            id, owner
        )))
    }
}
