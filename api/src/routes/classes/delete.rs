use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use db::models::class::Model as Class;
use util::state::AppState;

use crate::response::{ApiResponse, Empty};
use crate::routes::common::domain_error_response;

/// DELETE /api/classes/{class_id}
///
/// Deletes a class and its attendance rows. Staff/admin access.
pub async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> impl IntoResponse {
    match Class::delete(state.db(), class_id).await {
        Ok(()) => Json(ApiResponse::<Empty>::success(
            Empty,
            "Class deleted successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
