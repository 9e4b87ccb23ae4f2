//! # Users Routes Module
//!
//! Routes for the `/api/users` endpoint group.
//!
//! All management routes are admin-gated via `allow_admin`; `GET /{user_id}`
//! is open to any authenticated caller and checks the self-or-admin policy in
//! the handler, where the target id is known.

use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_user;
use get::{get_user, list_users, list_users_by_role};
use post::create_user;
use put::update_user;

use crate::auth::guards::{allow_admin, allow_authenticated};

/// Builds the `/users` route group.
///
/// - `POST /users` → `create_user` (admin only)
/// - `GET /users` → `list_users` (admin only)
/// - `GET /users/role/{role}` → `list_users_by_role` (admin only)
/// - `GET /users/{user_id}` → `get_user` (self or admin)
/// - `PUT /users/{user_id}` → `update_user` (admin only)
/// - `DELETE /users/{user_id}` → `delete_user` (admin only)
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).route_layer(from_fn(allow_admin)))
        .route("/", get(list_users).route_layer(from_fn(allow_admin)))
        .route(
            "/role/{role}",
            get(list_users_by_role).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{user_id}",
            get(get_user).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{user_id}",
            put(update_user).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{user_id}",
            delete(delete_user).route_layer(from_fn(allow_admin)),
        )
}
