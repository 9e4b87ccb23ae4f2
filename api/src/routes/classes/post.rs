use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::class::{Model as Class, NewClass};
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::classes::common::{ClassResponse, CreateClassRequest};
use crate::routes::common::{domain_error_response, validation_error_response};

/// POST /api/classes
///
/// Schedules a one-to-one class. Staff/admin access; the caller is recorded
/// as the scheduling actor.
///
/// ### Request Body
/// ```json
/// {
///   "teacher_id": 3,
///   "student_id": 7,
///   "start_time": "2026-03-10T10:00:00Z",
///   "end_time": "2026-03-10T11:00:00Z",
///   "meet_link": "https://meet.example.com/abc"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` — the scheduled class
/// - `400 Bad Request` — validation failure or inverted time window
/// - `404 Not Found` / `400` — unknown participant / wrong role
/// - `409 Conflict` — teacher or student is double-booked
pub async fn create_class(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateClassRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_error_response(&e);
    }
    if req.start_time >= req.end_time {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ClassResponse>::error(
                "Class start time must be before end time",
            )),
        )
            .into_response();
    }

    match Class::create(
        state.db(),
        NewClass {
            teacher_id: req.teacher_id,
            student_id: req.student_id,
            start_time: req.start_time,
            end_time: req.end_time,
            meet_link: req.meet_link,
            staff_id: claims.sub,
        },
    )
    .await
    {
        Ok(class) => (
            StatusCode::CREATED,
            Json(ApiResponse::<ClassResponse>::success(
                class.into(),
                "Class created successfully",
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
