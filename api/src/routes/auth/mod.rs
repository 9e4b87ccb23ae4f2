//! # Auth Routes Module
//!
//! Routes for `/api/auth`: credential login and token introspection.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

use get::profile;
use post::login;

/// Builds the `/auth` route group.
///
/// - `POST /auth/login` → `login` (public)
/// - `GET /auth/profile` → `profile` (any valid token)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile))
}
