//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the appropriate access
//! control middleware:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Login and token introspection
//! - `/users` → User directory management (admin, with self-read)
//! - `/classes` → Scheduling and timetables (staff/admin, with self timetables)
//! - `/attendance` → Punch-in/punch-out and reporting

use axum::Router;
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod health;
pub mod users;

use attendance::attendance_routes;
use auth::auth_routes;
use classes::classes_routes;
use health::health_routes;
use users::users_routes;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router is fully stateful; `main` nests it under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes())
        .nest("/classes", classes_routes())
        .nest("/attendance", attendance_routes())
        .with_state(app_state)
}
