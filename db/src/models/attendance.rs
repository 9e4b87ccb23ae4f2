use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    Condition, DatabaseConnection, FromQueryResult, JoinType, PaginatorTrait, QueryOrder,
    QuerySelect, Select, Set,
};
use serde::Serialize;

use crate::error::{DomainError, is_unique_violation};
use crate::models::user::{self, Role};
use crate::models::class;
use crate::status::AttendanceStatus;

/// One punch record per (class, user) pair, created lazily on first punch-in.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub punch_in: Option<DateTime<Utc>>,
    pub punch_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One attendance report row: a user's punches against the class schedule,
/// classified by the canonical status function.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub user_id: i64,
    pub user_alias: String,
    pub user_role: Role,
    pub class_id: i64,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub actual_punch_in: Option<DateTime<Utc>>,
    pub actual_punch_out: Option<DateTime<Utc>>,
    pub meet_link: Option<String>,
    pub attendance_status: AttendanceStatus,
}

/// Optional filters for the admin-wide attendance report.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub user_id: Option<i64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub role: Option<Role>,
}

/// A class with both participants' aliases, for the combined report.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    #[serde(flatten)]
    pub class: class::Model,
    pub teacher_alias: String,
    pub student_alias: String,
}

/// Both sides of a class's attendance; `None` where no punch-in ever happened.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedAttendanceReport {
    pub class: ClassSummary,
    pub teacher_attendance: Option<AttendanceReport>,
    pub student_attendance: Option<AttendanceReport>,
}

/// Per-user aggregate over a date-bounded set of classes.
///
/// `absent_classes` counts classes with no attendance row at all (absent by
/// omission), not report rows with status `absent`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttendanceStats {
    pub total_classes: u64,
    pub attended_classes: u64,
    pub on_time_classes: u64,
    pub late_classes: u64,
    pub partial_classes: u64,
    pub absent_classes: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, FromQueryResult)]
struct ReportRow {
    user_id: i64,
    user_alias: String,
    user_role: Role,
    class_id: i64,
    scheduled_start: DateTime<Utc>,
    scheduled_end: DateTime<Utc>,
    actual_punch_in: Option<DateTime<Utc>>,
    actual_punch_out: Option<DateTime<Utc>>,
    meet_link: Option<String>,
}

impl From<ReportRow> for AttendanceReport {
    fn from(row: ReportRow) -> Self {
        let attendance_status = AttendanceStatus::derive(
            row.scheduled_start,
            row.actual_punch_in,
            row.actual_punch_out,
        );
        AttendanceReport {
            user_id: row.user_id,
            user_alias: row.user_alias,
            user_role: row.user_role,
            class_id: row.class_id,
            scheduled_start: row.scheduled_start,
            scheduled_end: row.scheduled_end,
            actual_punch_in: row.actual_punch_in,
            actual_punch_out: row.actual_punch_out,
            meet_link: row.meet_link,
            attendance_status,
        }
    }
}

/// attendance ⋈ users ⋈ classes projected onto [`ReportRow`].
fn report_query() -> Select<Entity> {
    Entity::find()
        .select_only()
        .column_as(Column::UserId, "user_id")
        .column_as(user::Column::Alias, "user_alias")
        .column_as(user::Column::Role, "user_role")
        .column_as(Column::ClassId, "class_id")
        .column_as(class::Column::StartTime, "scheduled_start")
        .column_as(class::Column::EndTime, "scheduled_end")
        .column_as(Column::PunchIn, "actual_punch_in")
        .column_as(Column::PunchOut, "actual_punch_out")
        .column_as(class::Column::MeetLink, "meet_link")
        .join(JoinType::InnerJoin, Relation::User.def())
        .join(JoinType::InnerJoin, Relation::Class.def())
}

/// The class must exist and the user must be one of its two participants.
/// A single combined lookup keeps non-participants from probing class ids.
async fn membership_check(
    db: &DatabaseConnection,
    user_id: i64,
    class_id: i64,
) -> Result<class::Model, DomainError> {
    class::Entity::find()
        .filter(class::Column::Id.eq(class_id))
        .filter(
            Condition::any()
                .add(class::Column::TeacherId.eq(user_id))
                .add(class::Column::StudentId.eq(user_id)),
        )
        .one(db)
        .await?
        .ok_or_else(|| {
            DomainError::not_found("Class not found or user not assigned to this class")
        })
}

impl Model {
    /// Records a punch-in for `(class_id, user_id)` at the current instant.
    ///
    /// Creates the attendance row lazily, or fills `punch_in` on a row that
    /// lacks one. A second punch-in fails with `DuplicatePunchIn`; concurrent
    /// first punch-ins race on the (class_id, user_id) unique index and the
    /// loser surfaces the same error.
    pub async fn punch_in(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
    ) -> Result<Model, DomainError> {
        membership_check(db, user_id, class_id).await?;

        let existing = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await?;

        let now = Utc::now();

        tracing::debug!(user_id, class_id, "punch in");

        match existing {
            Some(row) if row.punch_in.is_some() => Err(DomainError::DuplicatePunchIn),
            Some(row) => {
                let mut active: ActiveModel = row.into();
                active.punch_in = Set(Some(now));
                Ok(active.update(db).await?)
            }
            None => {
                let active = ActiveModel {
                    class_id: Set(class_id),
                    user_id: Set(user_id),
                    punch_in: Set(Some(now)),
                    created_at: Set(now),
                    ..Default::default()
                };
                active.insert(db).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        DomainError::DuplicatePunchIn
                    } else {
                        DomainError::Storage(e)
                    }
                })
            }
        }
    }

    /// Records a punch-out for `(class_id, user_id)` at the current instant.
    ///
    /// Requires an existing punch-in (`PunchOutBeforePunchIn` otherwise) and
    /// rejects a second punch-out (`DuplicatePunchOut`). A completed row is
    /// terminal.
    pub async fn punch_out(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
    ) -> Result<Model, DomainError> {
        membership_check(db, user_id, class_id).await?;

        let existing = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await?;

        let row = match existing {
            Some(row) if row.punch_in.is_some() => row,
            _ => return Err(DomainError::PunchOutBeforePunchIn),
        };
        if row.punch_out.is_some() {
            return Err(DomainError::DuplicatePunchOut);
        }

        let mut active: ActiveModel = row.into();
        active.punch_out = Set(Some(Utc::now()));
        Ok(active.update(db).await?)
    }

    /// Raw punch rows for a class, oldest first.
    pub async fn list_by_class(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<Vec<Model>, DomainError> {
        Ok(Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// A user's attendance joined against their classes, optionally bounded
    /// by `class.start_time >= start` and `class.end_time <= end`, ordered by
    /// class start time.
    pub async fn report_for_user(
        db: &DatabaseConnection,
        user_id: i64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<AttendanceReport>, DomainError> {
        let mut query = report_query().filter(Column::UserId.eq(user_id));
        if let Some(start) = start {
            query = query.filter(class::Column::StartTime.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(class::Column::EndTime.lte(end));
        }
        let rows = query
            .order_by_asc(class::Column::StartTime)
            .into_model::<ReportRow>()
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Admin-wide report with optional user, role and date filters, ordered
    /// by (class start time, user id).
    pub async fn report(
        db: &DatabaseConnection,
        filter: ReportFilter,
    ) -> Result<Vec<AttendanceReport>, DomainError> {
        let mut query = report_query();
        if let Some(user_id) = filter.user_id {
            query = query.filter(Column::UserId.eq(user_id));
        }
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(start) = filter.start {
            query = query.filter(class::Column::StartTime.gte(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(class::Column::EndTime.lte(end));
        }
        let rows = query
            .order_by_asc(class::Column::StartTime)
            .order_by_asc(Column::UserId)
            .into_model::<ReportRow>()
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// The class plus each participant's own report row (or `None` where no
    /// punch-in ever happened).
    pub async fn combined_report(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<CombinedAttendanceReport, DomainError> {
        let class = class::Model::get(db, class_id).await?;
        let teacher = user::Model::get(db, class.teacher_id).await?;
        let student = user::Model::get(db, class.student_id).await?;

        let side = |user_id: i64| {
            report_query()
                .filter(Column::ClassId.eq(class_id))
                .filter(Column::UserId.eq(user_id))
                .into_model::<ReportRow>()
        };
        let teacher_attendance = side(class.teacher_id).one(db).await?.map(Into::into);
        let student_attendance = side(class.student_id).one(db).await?.map(Into::into);

        Ok(CombinedAttendanceReport {
            class: ClassSummary {
                class,
                teacher_alias: teacher.alias,
                student_alias: student.alias,
            },
            teacher_attendance,
            student_attendance,
        })
    }

    /// Aggregate counts over all of a user's classes within the bounds.
    ///
    /// `total_classes` counts every class involving the user, whether or not
    /// an attendance row exists; classes that never got one are absent by
    /// omission and only show up in `absent_classes`.
    pub async fn stats_for_user(
        db: &DatabaseConnection,
        user_id: i64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<AttendanceStats, DomainError> {
        let mut total_query = class::Entity::find().filter(
            Condition::any()
                .add(class::Column::TeacherId.eq(user_id))
                .add(class::Column::StudentId.eq(user_id)),
        );
        if let Some(start) = start {
            total_query = total_query.filter(class::Column::StartTime.gte(start));
        }
        if let Some(end) = end {
            total_query = total_query.filter(class::Column::EndTime.lte(end));
        }
        let total_classes = total_query.count(db).await?;

        let reports = Self::report_for_user(db, user_id, start, end).await?;
        let attended_classes = reports.len() as u64;
        let count_status = |status: AttendanceStatus| {
            reports
                .iter()
                .filter(|r| r.attendance_status == status)
                .count() as u64
        };

        let attendance_rate = if total_classes > 0 {
            let rate = attended_classes as f64 / total_classes as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(AttendanceStats {
            total_classes,
            attended_classes,
            on_time_classes: count_status(AttendanceStatus::OnTime),
            late_classes: count_status(AttendanceStatus::Late),
            partial_classes: count_status(AttendanceStatus::Partial),
            absent_classes: total_classes.saturating_sub(attended_classes),
            attendance_rate,
        })
    }
}
