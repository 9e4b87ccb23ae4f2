use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Model as User;
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::{domain_error_response, validation_error_response};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub id: i64,
    pub alias: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Authenticate an existing user and issue a JWT.
///
/// ### Request Body
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "strongpassword"
/// }
/// ```
///
/// ### Responses
/// - `200 OK` — user details plus `token` and `expires_at`
/// - `400 Bad Request` — validation failure
/// - `401 Unauthorized` — unknown email or wrong password (indistinguishable
///   on purpose)
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return validation_error_response(&validation_errors);
    }

    let user = match User::get_by_email(state.db(), &req.email).await {
        Ok(user) => user,
        Err(e) => return domain_error_response(e),
    };

    let user = match user {
        Some(user) if user.verify_password(&req.password) => user,
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<LoginResponse>::error("Invalid email or password")),
            )
                .into_response();
        }
    };

    let (token, expires_at) = generate_jwt(&user);
    tracing::info!(user_id = user.id, "user logged in");

    Json(ApiResponse::success(
        LoginResponse {
            id: user.id,
            alias: user.alias,
            email: user.email,
            role: user.role.to_string(),
            token,
            expires_at,
        },
        "Login successful",
    ))
    .into_response()
}
