use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::error::{ConflictParty, DomainError};
use crate::models::user::{self, Role};
use crate::status::AttendanceStatus;

/// A scheduled one-to-one class between a teacher and a student.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    /// Staff or admin user who scheduled the class.
    pub staff_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meet_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StaffId",
        to = "super::user::Column::Id"
    )]
    Staff,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Parameters for scheduling a new class.
#[derive(Debug, Clone)]
pub struct NewClass {
    pub teacher_id: i64,
    pub student_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meet_link: Option<String>,
    /// The staff/admin actor creating the class.
    pub staff_id: i64,
}

/// Partial update for a class. Absent fields are left untouched;
/// `meet_link` distinguishes "absent" from "set to null".
#[derive(Debug, Clone, Default)]
pub struct ClassPatch {
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub meet_link: Option<Option<String>>,
}

impl ClassPatch {
    pub fn is_empty(&self) -> bool {
        self.teacher_id.is_none()
            && self.student_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.meet_link.is_none()
    }

    fn touches_schedule(&self) -> bool {
        self.teacher_id.is_some()
            || self.student_id.is_some()
            || self.start_time.is_some()
            || self.end_time.is_some()
    }
}

/// One row of a person's timetable: the class, the counterpart's alias and
/// the person's own attendance classified by the canonical status function.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableEntry {
    pub class_id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub counterpart_alias: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meet_link: Option<String>,
    pub attendance_status: AttendanceStatus,
}

/// Intervals [s1,e1) and [s2,e2) overlap iff `s1 < e2 AND s2 < e1`;
/// touching at a boundary is not a conflict.
fn overlap_filter(start: DateTime<Utc>, end: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(Column::StartTime.lt(end))
        .add(Column::EndTime.gt(start))
}

async fn ensure_role<C>(
    db: &C,
    user_id: i64,
    role: Role,
    label: &str,
) -> Result<(), DomainError>
where
    C: ConnectionTrait,
{
    match user::Entity::find_by_id(user_id).one(db).await? {
        None => Err(DomainError::not_found(format!("{label} {user_id} not found"))),
        Some(u) if u.role != role => Err(DomainError::RoleMismatch(format!(
            "User {user_id} does not have the {role} role"
        ))),
        Some(_) => Ok(()),
    }
}

/// Looks for an existing class of `person` (as teacher or student, per
/// `column`) overlapping [start, end), optionally ignoring one class id.
async fn find_conflict<C>(
    db: &C,
    column: Column,
    person: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<i64>,
) -> Result<Option<i64>, DomainError>
where
    C: ConnectionTrait,
{
    let mut query = Entity::find()
        .filter(column.eq(person))
        .filter(overlap_filter(start, end));
    if let Some(id) = exclude {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.one(db).await?.map(|c| c.id))
}

async fn check_conflicts<C>(
    db: &C,
    teacher_id: i64,
    student_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<i64>,
) -> Result<(), DomainError>
where
    C: ConnectionTrait,
{
    if find_conflict(db, Column::TeacherId, teacher_id, start, end, exclude)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(ConflictParty::Teacher));
    }
    if find_conflict(db, Column::StudentId, student_id, start, end, exclude)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(ConflictParty::Student));
    }
    Ok(())
}

impl Model {
    /// Schedules a class. Role validation, both overlap checks and the insert
    /// run in one transaction so concurrent conflicting creates cannot both
    /// be admitted.
    pub async fn create(db: &DatabaseConnection, params: NewClass) -> Result<Model, DomainError> {
        if params.start_time >= params.end_time {
            return Err(DomainError::Validation(
                "Class start time must be before end time".into(),
            ));
        }

        let txn = db.begin().await?;

        ensure_role(&txn, params.teacher_id, Role::Teacher, "Teacher").await?;
        ensure_role(&txn, params.student_id, Role::Student, "Student").await?;
        check_conflicts(
            &txn,
            params.teacher_id,
            params.student_id,
            params.start_time,
            params.end_time,
            None,
        )
        .await?;

        let created = ActiveModel {
            teacher_id: Set(params.teacher_id),
            student_id: Set(params.student_id),
            staff_id: Set(params.staff_id),
            start_time: Set(params.start_time),
            end_time: Set(params.end_time),
            meet_link: Set(params.meet_link),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(
            class_id = created.id,
            teacher_id = created.teacher_id,
            student_id = created.student_id,
            "class scheduled"
        );
        Ok(created)
    }

    /// Fetches a class or fails with `NotFound`.
    pub async fn get(db: &DatabaseConnection, class_id: i64) -> Result<Model, DomainError> {
        Entity::find_by_id(class_id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Class {class_id} not found")))
    }

    /// Lists classes newest-start-first with the total count for pagination.
    pub async fn list(
        db: &DatabaseConnection,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Model>, u64), DomainError> {
        let paginator = Entity::find()
            .order_by_desc(Column::StartTime)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let classes = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((classes, total))
    }

    /// Classes entirely contained in [start, end], ordered by start time.
    pub async fn list_by_date_range(
        db: &DatabaseConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Model>, DomainError> {
        Ok(Entity::find()
            .filter(Column::StartTime.gte(start))
            .filter(Column::EndTime.lte(end))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await?)
    }

    /// Applies a partial update. Supplied teacher/student refs are
    /// re-validated for role, and any patch touching the schedule re-runs the
    /// overlap checks against the merged values (excluding this class).
    pub async fn update(
        db: &DatabaseConnection,
        class_id: i64,
        patch: ClassPatch,
    ) -> Result<Model, DomainError> {
        let txn = db.begin().await?;

        let existing = Entity::find_by_id(class_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Class {class_id} not found")))?;

        if patch.is_empty() {
            txn.commit().await?;
            return Ok(existing);
        }

        if let Some(teacher_id) = patch.teacher_id {
            ensure_role(&txn, teacher_id, Role::Teacher, "Teacher").await?;
        }
        if let Some(student_id) = patch.student_id {
            ensure_role(&txn, student_id, Role::Student, "Student").await?;
        }

        let teacher_id = patch.teacher_id.unwrap_or(existing.teacher_id);
        let student_id = patch.student_id.unwrap_or(existing.student_id);
        let start_time = patch.start_time.unwrap_or(existing.start_time);
        let end_time = patch.end_time.unwrap_or(existing.end_time);

        if start_time >= end_time {
            return Err(DomainError::Validation(
                "Class start time must be before end time".into(),
            ));
        }

        if patch.touches_schedule() {
            check_conflicts(&txn, teacher_id, student_id, start_time, end_time, Some(class_id))
                .await?;
        }

        let mut active: ActiveModel = existing.into();
        if let Some(id) = patch.teacher_id {
            active.teacher_id = Set(id);
        }
        if let Some(id) = patch.student_id {
            active.student_id = Set(id);
        }
        if let Some(start) = patch.start_time {
            active.start_time = Set(start);
        }
        if let Some(end) = patch.end_time {
            active.end_time = Set(end);
        }
        if let Some(link) = patch.meet_link {
            active.meet_link = Set(link);
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a class, cascading its attendance rows first so the FK
    /// invariant holds throughout.
    pub async fn delete(db: &DatabaseConnection, class_id: i64) -> Result<(), DomainError> {
        let txn = db.begin().await?;

        Entity::find_by_id(class_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Class {class_id} not found")))?;

        let cascaded = super::attendance::Entity::delete_many()
            .filter(super::attendance::Column::ClassId.eq(class_id))
            .exec(&txn)
            .await?;
        Entity::delete_by_id(class_id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            class_id,
            attendance_rows = cascaded.rows_affected,
            "class deleted"
        );
        Ok(())
    }

    /// All classes taught by `teacher_id`, ordered by start time, annotated
    /// with the student's alias and the teacher's own attendance.
    pub async fn teacher_timetable(
        db: &DatabaseConnection,
        teacher_id: i64,
    ) -> Result<Vec<TimetableEntry>, DomainError> {
        let classes = Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await?;
        timetable_entries(db, classes, teacher_id, |c| c.student_id).await
    }

    /// All classes attended by `student_id`, ordered by start time, annotated
    /// with the teacher's alias and the student's own attendance.
    pub async fn student_timetable(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Vec<TimetableEntry>, DomainError> {
        let classes = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await?;
        timetable_entries(db, classes, student_id, |c| c.teacher_id).await
    }
}

async fn timetable_entries(
    db: &DatabaseConnection,
    classes: Vec<Model>,
    person_id: i64,
    counterpart: fn(&Model) -> i64,
) -> Result<Vec<TimetableEntry>, DomainError> {
    if classes.is_empty() {
        return Ok(Vec::new());
    }

    let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();
    let counterpart_ids: Vec<i64> = classes.iter().map(counterpart).collect();

    let aliases: HashMap<i64, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(counterpart_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.alias))
        .collect();

    let punches: HashMap<i64, (Option<DateTime<Utc>>, Option<DateTime<Utc>>)> =
        super::attendance::Entity::find()
            .filter(super::attendance::Column::ClassId.is_in(class_ids))
            .filter(super::attendance::Column::UserId.eq(person_id))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.class_id, (a.punch_in, a.punch_out)))
            .collect();

    Ok(classes
        .into_iter()
        .map(|c| {
            let (punch_in, punch_out) = punches.get(&c.id).copied().unwrap_or((None, None));
            TimetableEntry {
                class_id: c.id,
                teacher_id: c.teacher_id,
                student_id: c.student_id,
                counterpart_alias: aliases.get(&counterpart(&c)).cloned(),
                attendance_status: AttendanceStatus::derive(c.start_time, punch_in, punch_out),
                start_time: c.start_time,
                end_time: c.end_time,
                meet_link: c.meet_link,
            }
        })
        .collect())
}
