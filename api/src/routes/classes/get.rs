use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::class::{Model as Class, TimetableEntry};
use db::models::user::Role;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::auth::policy::{self, Decision, Operation};
use crate::response::ApiResponse;
use crate::routes::classes::common::{ClassListResponse, ClassResponse, PaginationQuery};
use crate::routes::common::domain_error_response;

/// GET /api/classes
///
/// Lists classes newest-start-first with pagination. Staff/admin access.
pub async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    match Class::list(state.db(), page, per_page).await {
        Ok((classes, total)) => Json(ApiResponse::success(
            ClassListResponse {
                classes: classes.into_iter().map(ClassResponse::from).collect(),
                page,
                per_page,
                total,
            },
            "Classes fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/classes/{class_id}
///
/// Fetches one class. Any authenticated caller.
pub async fn get_class(State(state): State<AppState>, Path(class_id): Path<i64>) -> impl IntoResponse {
    match Class::get(state.db(), class_id).await {
        Ok(class) => Json(ApiResponse::<ClassResponse>::success(
            class.into(),
            "Class fetched successfully",
        ))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/classes/teacher/{teacher_id}/timetable
///
/// A teacher's classes in start order, annotated with the student's alias and
/// the teacher's own attendance status. Self, staff or admin.
pub async fn get_teacher_timetable(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(teacher_id): Path<i64>,
) -> impl IntoResponse {
    if let Decision::Denied(message) =
        policy::evaluate(Operation::ViewTimetable, &claims, Some(teacher_id))
    {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Vec<TimetableEntry>>::error(message)),
        )
            .into_response();
    }

    match Class::teacher_timetable(state.db(), teacher_id).await {
        Ok(entries) => Json(ApiResponse::success(entries, "Timetable fetched successfully"))
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/classes/student/{student_id}/timetable
///
/// A student's classes in start order, annotated with the teacher's alias and
/// the student's own attendance status. Self, staff or admin.
pub async fn get_student_timetable(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> impl IntoResponse {
    if let Decision::Denied(message) =
        policy::evaluate(Operation::ViewTimetable, &claims, Some(student_id))
    {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Vec<TimetableEntry>>::error(message)),
        )
            .into_response();
    }

    match Class::student_timetable(state.db(), student_id).await {
        Ok(entries) => Json(ApiResponse::success(entries, "Timetable fetched successfully"))
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/classes/my/timetable
///
/// The caller's own timetable, dispatched on their role.
pub async fn get_my_timetable(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    let result = match claims.role {
        Role::Teacher => Class::teacher_timetable(state.db(), claims.sub).await,
        Role::Student => Class::student_timetable(state.db(), claims.sub).await,
        // Unreachable behind the teacher-or-student guard.
        _ => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::<Vec<TimetableEntry>>::error(
                    "Only teachers and students have a timetable",
                )),
            )
                .into_response();
        }
    };

    match result {
        Ok(entries) => Json(ApiResponse::success(entries, "Timetable fetched successfully"))
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
