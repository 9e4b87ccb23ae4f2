use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::error::{ConflictParty, DomainError};
use crate::models::attendance;
use crate::models::class::{ClassPatch, Model as Class, NewClass};
use crate::models::user::{Model as User, Role};
use crate::status::AttendanceStatus;
use crate::test_utils::setup_test_db;
use crate::tests::helpers::{at, schedule, seed_people};

#[tokio::test]
async fn create_class_persists_actor_and_window() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    let class = schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    assert_eq!(class.teacher_id, teacher.id);
    assert_eq!(class.student_id, student.id);
    assert_eq!(class.staff_id, staff.id);
    assert!(class.start_time < class.end_time);
}

#[tokio::test]
async fn create_class_rejects_inverted_window() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    let err = Class::create(
        &db,
        NewClass {
            teacher_id: teacher.id,
            student_id: student.id,
            start_time: at(11, 0),
            end_time: at(10, 0),
            meet_link: None,
            staff_id: staff.id,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn create_class_checks_participant_roles() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    // Student id in the teacher slot.
    let err = Class::create(
        &db,
        NewClass {
            teacher_id: student.id,
            student_id: student.id,
            start_time: at(10, 0),
            end_time: at(11, 0),
            meet_link: None,
            staff_id: staff.id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::RoleMismatch(_)));

    // Unknown student id.
    let err = Class::create(
        &db,
        NewClass {
            teacher_id: teacher.id,
            student_id: 9999,
            start_time: at(10, 0),
            end_time: at(11, 0),
            meet_link: None,
            staff_id: staff.id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn overlapping_class_for_teacher_is_rejected() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;
    let other_student = User::create(
        &db,
        Role::Student,
        "sasha-student",
        "sasha@scholar.test",
        "hunter2hunter",
    )
    .await
    .unwrap();

    schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    // 10:30-11:30 overlaps the teacher's 10:00-11:00 slot.
    let err = Class::create(
        &db,
        NewClass {
            teacher_id: teacher.id,
            student_id: other_student.id,
            start_time: at(10, 30),
            end_time: at(11, 30),
            meet_link: None,
            staff_id: staff.id,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DomainError::SchedulingConflict {
            party: ConflictParty::Teacher
        }
    ));
}

#[tokio::test]
async fn overlapping_class_for_student_is_rejected() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;
    let other_teacher = User::create(
        &db,
        Role::Teacher,
        "tom-teacher",
        "tom@scholar.test",
        "hunter2hunter",
    )
    .await
    .unwrap();

    schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    // Fully contained interval, different teacher, same student.
    let err = Class::create(
        &db,
        NewClass {
            teacher_id: other_teacher.id,
            student_id: student.id,
            start_time: at(10, 15),
            end_time: at(10, 45),
            meet_link: None,
            staff_id: staff.id,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DomainError::SchedulingConflict {
            party: ConflictParty::Student
        }
    ));
}

#[tokio::test]
async fn touching_intervals_do_not_conflict() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;
    // Back-to-back lessons share a boundary instant; that is not an overlap.
    let follow_up = schedule(&db, teacher.id, student.id, staff.id, at(11, 0), at(12, 0)).await;

    assert_eq!(follow_up.start_time, at(11, 0));
}

#[tokio::test]
async fn update_patches_only_supplied_fields() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;
    let class = schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    let updated = Class::update(
        &db,
        class.id,
        ClassPatch {
            meet_link: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.meet_link, None);
    assert_eq!(updated.start_time, class.start_time);
    assert_eq!(updated.teacher_id, class.teacher_id);

    let empty_patch = Class::update(&db, class.id, ClassPatch::default())
        .await
        .unwrap();
    assert_eq!(empty_patch.meet_link, None);
}

#[tokio::test]
async fn update_revalidates_overlap_against_merged_window() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;
    let afternoon = schedule(&db, teacher.id, student.id, staff.id, at(14, 0), at(15, 0)).await;

    // Moving the afternoon class into the morning slot double-books both parties.
    let err = Class::update(
        &db,
        afternoon.id,
        ClassPatch {
            start_time: Some(at(10, 30)),
            end_time: Some(at(11, 30)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::SchedulingConflict { .. }));

    // Shifting within free time still works, and a class never conflicts with itself.
    let moved = Class::update(
        &db,
        afternoon.id,
        ClassPatch {
            start_time: Some(at(14, 30)),
            end_time: Some(at(15, 30)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.start_time, at(14, 30));
}

#[tokio::test]
async fn update_unknown_class_is_not_found() {
    let db = setup_test_db().await;
    seed_people(&db).await;

    let err = Class::update(&db, 404, ClassPatch::default()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_attendance_rows() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;
    let class = schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    attendance::ActiveModel {
        class_id: Set(class.id),
        user_id: Set(teacher.id),
        punch_in: Set(Some(at(10, 1))),
        punch_out: Set(None),
        created_at: Set(at(10, 1)),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    Class::delete(&db, class.id).await.unwrap();

    let leftover = attendance::Entity::find()
        .filter(attendance::Column::ClassId.eq(class.id))
        .all(&db)
        .await
        .unwrap();
    assert!(leftover.is_empty());

    let err = Class::delete(&db, class.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn timetable_orders_by_start_and_joins_counterpart() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    let late_class = schedule(&db, teacher.id, student.id, staff.id, at(14, 0), at(15, 0)).await;
    let early_class = schedule(&db, teacher.id, student.id, staff.id, at(9, 0), at(10, 0)).await;

    // The teacher attended only the early class, on time.
    attendance::ActiveModel {
        class_id: Set(early_class.id),
        user_id: Set(teacher.id),
        punch_in: Set(Some(at(9, 2))),
        punch_out: Set(Some(at(9, 55))),
        created_at: Set(at(9, 2)),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let timetable = Class::teacher_timetable(&db, teacher.id).await.unwrap();
    assert_eq!(timetable.len(), 2);
    assert_eq!(timetable[0].class_id, early_class.id);
    assert_eq!(timetable[1].class_id, late_class.id);
    assert_eq!(timetable[0].counterpart_alias.as_deref(), Some("sam-student"));
    assert_eq!(timetable[0].attendance_status, AttendanceStatus::OnTime);
    assert_eq!(timetable[1].attendance_status, AttendanceStatus::Absent);

    let student_side = Class::student_timetable(&db, student.id).await.unwrap();
    assert_eq!(student_side[0].counterpart_alias.as_deref(), Some("tina-teacher"));
    // The student never punched anywhere.
    assert!(student_side
        .iter()
        .all(|e| e.attendance_status == AttendanceStatus::Absent));
}

#[tokio::test]
async fn timetable_status_uses_late_threshold() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;
    let class = schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    // Punched in 7 minutes late and completed the class.
    attendance::ActiveModel {
        class_id: Set(class.id),
        user_id: Set(teacher.id),
        punch_in: Set(Some(at(10, 7))),
        punch_out: Set(Some(at(10, 55))),
        created_at: Set(at(10, 7)),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let timetable = Class::teacher_timetable(&db, teacher.id).await.unwrap();
    assert_eq!(timetable[0].attendance_status, AttendanceStatus::Late);
}

#[tokio::test]
async fn list_by_date_range_returns_contained_classes() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    let inside = schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;
    // Ends after the queried range.
    schedule(&db, teacher.id, student.id, staff.id, at(11, 30), at(13, 0)).await;

    let found = Class::list_by_date_range(&db, at(9, 0), at(12, 0)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, inside.id);
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;

    schedule(&db, teacher.id, student.id, staff.id, at(9, 0), at(10, 0)).await;
    schedule(&db, teacher.id, student.id, staff.id, at(11, 0), at(12, 0)).await;
    schedule(&db, teacher.id, student.id, staff.id, at(13, 0), at(14, 0)).await;

    let (first_page, total) = Class::list(&db, 1, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].start_time, at(13, 0));

    let (second_page, _) = Class::list(&db, 2, 2).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].start_time, at(9, 0));
}
