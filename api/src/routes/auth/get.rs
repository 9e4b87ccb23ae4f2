use axum::{Json, extract::State, response::IntoResponse};
use db::models::user::Model as User;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::domain_error_response;
use crate::routes::users::common::UserResponse;

/// GET /auth/profile
///
/// Returns the authenticated caller's own user record.
pub async fn profile(State(state): State<AppState>, AuthUser(claims): AuthUser) -> impl IntoResponse {
    match User::get(state.db(), claims.sub).await {
        Ok(user) => Json(ApiResponse::<UserResponse>::success(
            user.into(),
            "Profile fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
