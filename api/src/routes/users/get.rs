use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::user::{Model as User, Role};
use std::str::FromStr;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::auth::policy::{self, Decision, Operation};
use crate::response::ApiResponse;
use crate::routes::common::domain_error_response;
use crate::routes::users::common::{PaginationQuery, UserListResponse, UserResponse};

/// GET /api/users
///
/// Lists users newest-first with pagination. Admin-only access.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    match User::list(state.db(), page, per_page).await {
        Ok((users, total)) => Json(ApiResponse::success(
            UserListResponse {
                users: users.into_iter().map(UserResponse::from).collect(),
                page,
                per_page,
                total,
            },
            "Users fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/users/role/{role}
///
/// Lists users holding the given role. Admin-only access.
pub async fn list_users_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> impl IntoResponse {
    let Ok(role) = Role::from_str(&role) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Vec<UserResponse>>::error(format!(
                "Unknown role: '{role}'"
            ))),
        )
            .into_response();
    };

    match User::list_by_role(state.db(), role).await {
        Ok(users) => Json(ApiResponse::success(
            users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
            "Users fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/users/{user_id}
///
/// Fetches one user. Admins may fetch anyone; everyone else only themselves.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    if let Decision::Denied(message) = policy::evaluate(Operation::ViewUser, &claims, Some(user_id))
    {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<UserResponse>::error(message)),
        )
            .into_response();
    }

    match User::get(state.db(), user_id).await {
        Ok(user) => Json(ApiResponse::<UserResponse>::success(
            user.into(),
            "User fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
