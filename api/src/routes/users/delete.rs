use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use db::models::user::Model as User;
use util::state::AppState;

use crate::response::{ApiResponse, Empty};
use crate::routes::common::domain_error_response;

/// DELETE /api/users/{user_id}
///
/// Deletes a user. Admin-only access. Refused while the user still owns
/// classes or attendance records.
pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> impl IntoResponse {
    match User::delete(state.db(), user_id).await {
        Ok(()) => Json(ApiResponse::<Empty>::success(
            Empty,
            "User deleted successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
