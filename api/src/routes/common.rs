//! Helpers shared by all route groups.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::error::DomainError;
use serde::{Deserialize, Deserializer};
use validator::ValidationErrors;

use crate::response::{ApiResponse, Empty};

/// Maps the domain error taxonomy onto HTTP status codes and the standard
/// response envelope. Storage errors are logged and masked.
pub fn domain_error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::Validation(_)
        | DomainError::RoleMismatch(_)
        | DomainError::PunchOutBeforePunchIn => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::SchedulingConflict { .. }
        | DomainError::DuplicatePunchIn
        | DomainError::DuplicatePunchOut
        | DomainError::Uniqueness(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        DomainError::Storage(e) => {
            tracing::error!(error = %e, "storage failure");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };

    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}

/// Flattens `validator` errors into one human-readable message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("Invalid value for {field}")),
            }
        }
    }
    messages.sort();
    messages.join("; ")
}

pub fn validation_error_response(errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Empty>::error(format_validation_errors(errors))),
    )
        .into_response()
}

/// Deserializes a field that distinguishes "absent" from "explicit null":
/// a missing key stays `None` (via `#[serde(default)]`), `null` becomes
/// `Some(None)` and a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
