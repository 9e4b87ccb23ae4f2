//! # Classes Routes Module
//!
//! Routes for the `/api/classes` endpoint group: scheduling, lookup and
//! timetables.
//!
//! Scheduling mutations are staff/admin-gated; timetable routes check the
//! self-or-staff policy in their handlers, where the target id is known.

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

use delete::delete_class;
use get::{get_class, get_my_timetable, get_student_timetable, get_teacher_timetable, list_classes};
use post::create_class;
use put::update_class;

use crate::auth::guards::{
    allow_authenticated, allow_own_timetable, allow_staff_or_admin, allow_view_class,
};

/// Builds the `/classes` route group.
///
/// - `POST /classes` → `create_class` (staff/admin)
/// - `GET /classes` → `list_classes` (staff/admin)
/// - `GET /classes/{class_id}` → `get_class` (authenticated)
/// - `PUT /classes/{class_id}` → `update_class` (staff/admin)
/// - `DELETE /classes/{class_id}` → `delete_class` (staff/admin)
/// - `GET /classes/teacher/{teacher_id}/timetable` → self, staff, admin
/// - `GET /classes/student/{student_id}/timetable` → self, staff, admin
/// - `GET /classes/my/timetable` → teacher/student
pub fn classes_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_class).route_layer(from_fn(allow_staff_or_admin)),
        )
        .route(
            "/",
            get(list_classes).route_layer(from_fn(allow_staff_or_admin)),
        )
        .route(
            "/my/timetable",
            get(get_my_timetable).route_layer(from_fn(allow_own_timetable)),
        )
        .route(
            "/teacher/{teacher_id}/timetable",
            get(get_teacher_timetable).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/student/{student_id}/timetable",
            get(get_student_timetable).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{class_id}",
            get(get_class).route_layer(from_fn(allow_view_class)),
        )
        .route(
            "/{class_id}",
            put(update_class).route_layer(from_fn(allow_staff_or_admin)),
        )
        .route(
            "/{class_id}",
            delete(delete_class).route_layer(from_fn(allow_staff_or_admin)),
        )
}
