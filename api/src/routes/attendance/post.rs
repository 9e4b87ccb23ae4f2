use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::attendance::Model as Attendance;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::attendance::common::{AttendanceResponse, PunchRequest};
use crate::routes::common::domain_error_response;

/// POST /api/attendance/punch-in
///
/// Records the caller's punch-in for a class they participate in.
///
/// ### Request Body
/// ```json
/// { "class_id": 12 }
/// ```
///
/// ### Responses
/// - `200 OK` — the attendance row, `punch_in` now set
/// - `404 Not Found` — class unknown or caller not a participant
/// - `409 Conflict` — already punched in
pub async fn punch_in(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<PunchRequest>,
) -> impl IntoResponse {
    match Attendance::punch_in(state.db(), claims.sub, req.class_id).await {
        Ok(row) => {
            tracing::info!(user_id = claims.sub, class_id = req.class_id, "punch in");
            (
                StatusCode::OK,
                Json(ApiResponse::<AttendanceResponse>::success(
                    row.into(),
                    "Punched in successfully",
                )),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/attendance/punch-out
///
/// Records the caller's punch-out for a class they participate in.
///
/// ### Responses
/// - `200 OK` — the attendance row, `punch_out` now set
/// - `400 Bad Request` — no prior punch-in
/// - `404 Not Found` — class unknown or caller not a participant
/// - `409 Conflict` — already punched out
pub async fn punch_out(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<PunchRequest>,
) -> impl IntoResponse {
    match Attendance::punch_out(state.db(), claims.sub, req.class_id).await {
        Ok(row) => {
            tracing::info!(user_id = claims.sub, class_id = req.class_id, "punch out");
            (
                StatusCode::OK,
                Json(ApiResponse::<AttendanceResponse>::success(
                    row.into(),
                    "Punched out successfully",
                )),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}
