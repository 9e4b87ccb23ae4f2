//! # Attendance Routes Module
//!
//! Routes for the `/api/attendance` endpoint group: punch-in/punch-out and
//! reporting.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

use get::{
    get_attendance_by_class, get_attendance_report, get_attendance_stats,
    get_combined_attendance_report, get_my_attendance, get_my_attendance_stats,
};
use post::{punch_in, punch_out};

use crate::auth::guards::{
    allow_authenticated, allow_class_attendance, allow_own_attendance, allow_punch,
    allow_report_admin,
};

/// Builds the `/attendance` route group.
///
/// - `POST /attendance/punch-in` → `punch_in` (teacher/student, self)
/// - `POST /attendance/punch-out` → `punch_out` (teacher/student, self)
/// - `GET /attendance/my` → `get_my_attendance` (teacher/student)
/// - `GET /attendance/my/stats` → `get_my_attendance_stats` (teacher/student)
/// - `GET /attendance/class/{class_id}` → `get_attendance_by_class` (staff/admin)
/// - `GET /attendance/report` → `get_attendance_report` (admin)
/// - `GET /attendance/report/combined/{class_id}` → `get_combined_attendance_report` (admin)
/// - `GET /attendance/stats/{user_id}` → `get_attendance_stats` (self, staff, admin)
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/punch-in",
            post(punch_in).route_layer(from_fn(allow_punch)),
        )
        .route(
            "/punch-out",
            post(punch_out).route_layer(from_fn(allow_punch)),
        )
        .route(
            "/my",
            get(get_my_attendance).route_layer(from_fn(allow_own_attendance)),
        )
        .route(
            "/my/stats",
            get(get_my_attendance_stats).route_layer(from_fn(allow_own_attendance)),
        )
        .route(
            "/class/{class_id}",
            get(get_attendance_by_class).route_layer(from_fn(allow_class_attendance)),
        )
        .route(
            "/report",
            get(get_attendance_report).route_layer(from_fn(allow_report_admin)),
        )
        .route(
            "/report/combined/{class_id}",
            get(get_combined_attendance_report).route_layer(from_fn(allow_report_admin)),
        )
        .route(
            "/stats/{user_id}",
            get(get_attendance_stats).route_layer(from_fn(allow_authenticated)),
        )
}
