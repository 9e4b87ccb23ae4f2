//! # User Creation Routes
//!
//! - `POST /api/users`: Create a user with a role (admin only)

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Model as User;
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::{domain_error_response, validation_error_response};
use crate::routes::users::common::{CreateUserRequest, UserResponse};

/// POST /api/users
///
/// Creates a user with the given role. Admin-only access.
///
/// ### Request Body
/// ```json
/// {
///   "role": "teacher",
///   "alias": "tina",
///   "email": "tina@example.com",
///   "password": "securepassword"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` — full user object (excluding password)
/// - `400 Bad Request` — validation failure
/// - `409 Conflict` — duplicate alias/email
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_error_response(&e);
    }

    match User::create(state.db(), req.role, &req.alias, &req.email, &req.password).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::<UserResponse>::success(
                user.into(),
                "User created successfully",
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
