use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use db::models::class::{ClassPatch, Model as Class};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::classes::common::{ClassResponse, UpdateClassRequest};
use crate::routes::common::domain_error_response;

/// PUT /api/classes/{class_id}
///
/// Partially updates a class; only supplied fields change, and `meet_link`
/// may be explicitly nulled. Changing participants or the time window re-runs
/// the double-booking check against the merged values. Staff/admin access.
///
/// ### Responses
/// - `200 OK` — updated class
/// - `400 Bad Request` — inverted merged time window / wrong participant role
/// - `404 Not Found` — unknown class or participant id
/// - `409 Conflict` — the patch would double-book a party
pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
) -> impl IntoResponse {
    let patch = ClassPatch {
        teacher_id: req.teacher_id,
        student_id: req.student_id,
        start_time: req.start_time,
        end_time: req.end_time,
        meet_link: req.meet_link,
    };

    match Class::update(state.db(), class_id, patch).await {
        Ok(class) => Json(ApiResponse::<ClassResponse>::success(
            class.into(),
            "Class updated successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
