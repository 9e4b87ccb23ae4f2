use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::attendance::{
    AttendanceReport, AttendanceStats, CombinedAttendanceReport, Model as Attendance, ReportFilter,
};
use db::models::user::Role;
use std::str::FromStr;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::auth::policy::{self, Decision, Operation};
use crate::response::ApiResponse;
use crate::routes::attendance::common::{AttendanceQuery, AttendanceResponse};
use crate::routes::common::domain_error_response;

/// GET /api/attendance/my
///
/// The caller's own attendance report, optionally date-bounded.
pub async fn get_my_attendance(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<AttendanceQuery>,
) -> impl IntoResponse {
    match Attendance::report_for_user(state.db(), claims.sub, query.start_date, query.end_date)
        .await
    {
        Ok(reports) => Json(ApiResponse::<Vec<AttendanceReport>>::success(
            reports,
            "Attendance fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/attendance/my/stats
///
/// The caller's own aggregate statistics, optionally date-bounded.
pub async fn get_my_attendance_stats(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<AttendanceQuery>,
) -> impl IntoResponse {
    match Attendance::stats_for_user(state.db(), claims.sub, query.start_date, query.end_date).await
    {
        Ok(stats) => Json(ApiResponse::<AttendanceStats>::success(
            stats,
            "Attendance stats fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/attendance/class/{class_id}
///
/// Raw punch rows for one class, oldest first. Staff/admin access.
pub async fn get_attendance_by_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> impl IntoResponse {
    match Attendance::list_by_class(state.db(), class_id).await {
        Ok(rows) => Json(ApiResponse::success(
            rows.into_iter().map(AttendanceResponse::from).collect::<Vec<_>>(),
            "Attendance fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/attendance/report
///
/// Attendance report across users with optional user/role/date filters,
/// ordered by (class start, user id). Admin-only access.
pub async fn get_attendance_report(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> impl IntoResponse {
    let role = match query.role.as_deref() {
        None => None,
        Some(raw) => match Role::from_str(raw) {
            Ok(role) => Some(role),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<Vec<AttendanceReport>>::error(format!(
                        "Unknown role: '{raw}'"
                    ))),
                )
                    .into_response();
            }
        },
    };

    let filter = ReportFilter {
        user_id: query.user_id,
        start: query.start_date,
        end: query.end_date,
        role,
    };

    match Attendance::report(state.db(), filter).await {
        Ok(reports) => Json(ApiResponse::<Vec<AttendanceReport>>::success(
            reports,
            "Attendance report fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/attendance/report/combined/{class_id}
///
/// One class with both participants' attendance side by side. Admin-only
/// access.
pub async fn get_combined_attendance_report(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> impl IntoResponse {
    match Attendance::combined_report(state.db(), class_id).await {
        Ok(report) => Json(ApiResponse::<CombinedAttendanceReport>::success(
            report,
            "Combined attendance report fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/attendance/stats/{user_id}
///
/// Aggregate statistics for one user. Self, staff or admin.
pub async fn get_attendance_stats(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Query(query): Query<AttendanceQuery>,
) -> impl IntoResponse {
    if let Decision::Denied(message) =
        policy::evaluate(Operation::ViewUserStats, &claims, Some(user_id))
    {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<AttendanceStats>::error(message)),
        )
            .into_response();
    }

    match Attendance::stats_for_user(state.db(), user_id, query.start_date, query.end_date).await {
        Ok(stats) => Json(ApiResponse::<AttendanceStats>::success(
            stats,
            "Attendance stats fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}
