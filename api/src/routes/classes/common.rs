use chrono::{DateTime, Utc};
use db::models::class::Model as Class;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::routes::common::double_option;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    pub teacher_id: i64,
    pub student_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    #[validate(url(message = "meet_link must be a valid URL"))]
    pub meet_link: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClassRequest {
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,

    /// Absent = keep, `null` = clear, string = replace.
    #[serde(default, deserialize_with = "double_option")]
    pub meet_link: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, Default)]
pub struct ClassResponse {
    pub id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub staff_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub meet_link: Option<String>,
    pub created_at: String,
}

impl From<Class> for ClassResponse {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            teacher_id: class.teacher_id,
            student_id: class.student_id,
            staff_id: class.staff_id,
            start_time: class.start_time.to_rfc3339(),
            end_time: class.end_time.to_rfc3339(),
            meet_link: class.meet_link,
            created_at: class.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ClassListResponse {
    pub classes: Vec<ClassResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}
