//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::CoreError;
use domain_records::RecordsError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, "validation_error", message, Some(details))
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => {
                error!(message = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RecordsError> for ApiError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::NotFound { .. } | RecordsError::SubjectNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            RecordsError::NullInput { .. } => ApiError::BadRequest(err.to_string()),
            RecordsError::Validation(ref errors) => ApiError::Validation {
                message: "Validation failed".to_string(),
                details: errors.iter().map(ToString::to_string).collect(),
            },
            RecordsError::Conflict(msg) => ApiError::Conflict(msg),
            RecordsError::Timeout { .. } => ApiError::ServiceUnavailable(err.to_string()),
            RecordsError::Store(ref port) if port.is_transient() => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            RecordsError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Identifier(_) | CoreError::Validation(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::Configuration(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_field_errors("", &errors, &mut details);
        details.sort();
        ApiError::Validation {
            message: "Request body failed validation".to_string(),
            details,
        }
    }
}

fn collect_field_errors(prefix: &str, errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PortError;
    use domain_records::FieldError;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_records_errors_map_to_status() {
        assert_eq!(
            status_of(RecordsError::not_found("Patient", "123456789012").into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RecordsError::subject_not_found("123456789012").into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RecordsError::null_input("Address").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RecordsError::Validation(vec![FieldError::new("email", "bad")]).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RecordsError::Conflict("taken".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(
                RecordsError::Timeout {
                    operation: "add_patient",
                    timeout_ms: 5
                }
                .into()
            ),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(RecordsError::Store(PortError::internal("boom")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_identifier_is_bad_request() {
        let err = core_kernel::AdhaarCardNo::parse("12ab").unwrap_err();
        assert_eq!(status_of(CoreError::from(err).into()), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_details_listed() {
        let api: ApiError = RecordsError::Validation(vec![
            FieldError::new("first_name", "required"),
            FieldError::new("ailment", "required"),
        ])
        .into();
        match api {
            ApiError::Validation { details, .. } => assert_eq!(details.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
