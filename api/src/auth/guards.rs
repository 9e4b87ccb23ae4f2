//! Role-based access guards, layered per route group.
//!
//! Each guard authenticates the caller, inserts the `AuthUser` into request
//! extensions for downstream handlers, and evaluates the authorization policy
//! for the route group's operation. Operations with a self-access rule are
//! additionally checked in their handlers, where the target user id is known.

use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::auth::claims::AuthUser;
use crate::auth::policy::{self, Decision, Operation};
use crate::response::{ApiResponse, Empty};

/// Extracts and validates the user from the request, then re-inserts it into
/// the request extensions so handlers can read it without re-parsing.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_operation(
    operation: Operation,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    match policy::evaluate(operation, &user.0, None) {
        Decision::Allowed => Ok(next.run(req).await),
        Decision::Denied(message) => Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(message)),
        )),
    }
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard for user management routes.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::ManageUsers, req, next).await
}

/// Guard for the scheduling routes (staff and admin).
pub async fn allow_staff_or_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::ManageClasses, req, next).await
}

/// Guard for the punch routes (teachers and students, acting on themselves).
pub async fn allow_punch(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::Punch, req, next).await
}

/// Guard for a caller's own attendance and stats routes.
pub async fn allow_own_attendance(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::ViewOwnAttendance, req, next).await
}

/// Guard for a caller's own timetable route.
pub async fn allow_own_timetable(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::ViewOwnTimetable, req, next).await
}

/// Guard for single-class lookup (any directory role).
pub async fn allow_view_class(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::ViewClass, req, next).await
}

/// Admin-only guard for the reporting routes.
pub async fn allow_report_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::AttendanceReport, req, next).await
}

/// Guard for staff/admin views of per-class attendance.
pub async fn allow_class_attendance(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_operation(Operation::ViewClassAttendance, req, next).await
}
