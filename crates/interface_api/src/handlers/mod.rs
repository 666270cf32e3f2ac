//! Request handlers

pub mod address;
pub mod doctor;
pub mod health;
pub mod patient;

use core_kernel::{AdhaarCardNo, CoreError};

use crate::error::ApiError;

/// Parses an identity number taken from the request path
pub(crate) fn parse_adhaar_card_no(raw: &str) -> Result<AdhaarCardNo, ApiError> {
    AdhaarCardNo::parse(raw)
        .map_err(CoreError::from)
        .map_err(ApiError::from)
}
