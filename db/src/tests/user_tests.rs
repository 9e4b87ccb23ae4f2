use crate::error::DomainError;
use crate::models::attendance::Model as Attendance;
use crate::models::user::{Model as User, Role, UserPatch};
use crate::test_utils::setup_test_db;
use crate::tests::helpers::{at, schedule, seed_people};

#[tokio::test]
async fn create_hashes_password_and_round_trips() {
    let db = setup_test_db().await;

    let user = User::create(&db, Role::Admin, "ada-admin", "ada@scholar.test", "correct horse")
        .await
        .unwrap();

    assert_ne!(user.password_hash, "correct horse");
    assert!(user.verify_password("correct horse"));
    assert!(!user.verify_password("wrong horse"));
}

#[tokio::test]
async fn duplicate_email_and_alias_are_rejected() {
    let db = setup_test_db().await;

    User::create(&db, Role::Staff, "pat-staff", "pat@scholar.test", "hunter2hunter")
        .await
        .unwrap();

    let err = User::create(&db, Role::Staff, "other-alias", "pat@scholar.test", "hunter2hunter")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Uniqueness(_)));

    let err = User::create(&db, Role::Staff, "pat-staff", "other@scholar.test", "hunter2hunter")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Uniqueness(_)));
}

#[tokio::test]
async fn update_patches_only_supplied_fields() {
    let db = setup_test_db().await;
    let (_, teacher, _) = seed_people(&db).await;

    let updated = User::update(
        &db,
        teacher.id,
        UserPatch {
            alias: Some("tina-renamed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.alias, "tina-renamed");
    assert_eq!(updated.email, teacher.email);
    assert_eq!(updated.role, Role::Teacher);

    // Password change keeps the old one from verifying.
    let updated = User::update(
        &db,
        teacher.id,
        UserPatch {
            password: Some("brand new pass".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(updated.verify_password("brand new pass"));
    assert!(!updated.verify_password("hunter2hunter"));
}

#[tokio::test]
async fn update_rejects_taken_email_but_allows_own() {
    let db = setup_test_db().await;
    let (staff, teacher, _) = seed_people(&db).await;

    let err = User::update(
        &db,
        teacher.id,
        UserPatch {
            email: Some(staff.email.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Uniqueness(_)));

    // Re-submitting your own email is not a collision.
    let ok = User::update(
        &db,
        teacher.id,
        UserPatch {
            email: Some(teacher.email.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(ok.email, teacher.email);
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let db = setup_test_db().await;

    let err = User::update(&db, 404, UserPatch::default()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn delete_refuses_while_referenced() {
    let db = setup_test_db().await;
    let (staff, teacher, student) = seed_people(&db).await;
    let class = schedule(&db, teacher.id, student.id, staff.id, at(10, 0), at(11, 0)).await;

    let err = User::delete(&db, teacher.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // Attendance rows block deletion the same way.
    Attendance::punch_in(&db, student.id, class.id).await.unwrap();
    let err = User::delete(&db, student.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // The staff member owns no classes as a participant and never punched.
    User::delete(&db, staff.id).await.unwrap();
    assert!(User::find_by_id(&db, staff.id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_by_role_and_pagination() {
    let db = setup_test_db().await;
    seed_people(&db).await;
    User::create(&db, Role::Teacher, "tom-teacher", "tom@scholar.test", "hunter2hunter")
        .await
        .unwrap();

    let teachers = User::list_by_role(&db, Role::Teacher).await.unwrap();
    assert_eq!(teachers.len(), 2);
    assert!(teachers.iter().all(|u| u.role == Role::Teacher));

    let (page, total) = User::list(&db, 1, 3).await.unwrap();
    assert_eq!(total, 4);
    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn lookup_by_email() {
    let db = setup_test_db().await;
    let (_, teacher, _) = seed_people(&db).await;

    let found = User::get_by_email(&db, "tina@scholar.test").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(teacher.id));

    let missing = User::get_by_email(&db, "nobody@scholar.test").await.unwrap();
    assert!(missing.is_none());
}
