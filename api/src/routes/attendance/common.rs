use chrono::{DateTime, Utc};
use db::models::attendance::Model as Attendance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PunchRequest {
    pub class_id: i64,
}

/// Optional bounds/filters accepted by the reporting endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct AttendanceQuery {
    pub user_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct AttendanceResponse {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub punch_in: Option<String>,
    pub punch_out: Option<String>,
    pub created_at: String,
}

impl From<Attendance> for AttendanceResponse {
    fn from(row: Attendance) -> Self {
        Self {
            id: row.id,
            class_id: row.class_id,
            user_id: row.user_id,
            punch_in: row.punch_in.map(|t| t.to_rfc3339()),
            punch_out: row.punch_out.map(|t| t.to_rfc3339()),
            created_at: row.created_at.to_rfc3339(),
        }
    }
}
