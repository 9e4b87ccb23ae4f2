use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use db::models::user::{Model as User, UserPatch};
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::{domain_error_response, validation_error_response};
use crate::routes::users::common::{UpdateUserRequest, UserResponse};

/// PUT /api/users/{user_id}
///
/// Partially updates a user; only supplied fields change. Admin-only access.
///
/// ### Responses
/// - `200 OK` — updated user
/// - `400 Bad Request` — validation failure
/// - `404 Not Found` — unknown user id
/// - `409 Conflict` — alias/email taken by another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_error_response(&e);
    }

    let patch = UserPatch {
        role: req.role,
        alias: req.alias,
        email: req.email,
        password: req.password,
    };

    match User::update(state.db(), user_id, patch).await {
        Ok(user) => Json(ApiResponse::<UserResponse>::success(
            user.into(),
            "User updated successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
