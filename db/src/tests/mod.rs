mod scheduler_tests;
mod user_tests;

pub mod helpers {
    use chrono::{DateTime, TimeZone, Utc};
    use sea_orm::DatabaseConnection;

    use crate::models::class::{Model as Class, NewClass};
    use crate::models::user::{Model as User, Role};

    /// A clock reading on a fixed test day.
    pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, 0).unwrap()
    }

    pub fn at_sec(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, min, sec).unwrap()
    }

    /// Seeds one user of each role: (staff, teacher, student).
    pub async fn seed_people(db: &DatabaseConnection) -> (User, User, User) {
        let staff = User::create(db, Role::Staff, "pat-staff", "pat@scholar.test", "hunter2hunter")
            .await
            .expect("create staff");
        let teacher = User::create(db, Role::Teacher, "tina-teacher", "tina@scholar.test", "hunter2hunter")
            .await
            .expect("create teacher");
        let student = User::create(db, Role::Student, "sam-student", "sam@scholar.test", "hunter2hunter")
            .await
            .expect("create student");
        (staff, teacher, student)
    }

    /// Schedules a class between the fixture teacher and student.
    pub async fn schedule(
        db: &DatabaseConnection,
        teacher_id: i64,
        student_id: i64,
        staff_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Class {
        Class::create(
            db,
            NewClass {
                teacher_id,
                student_id,
                start_time: start,
                end_time: end,
                meet_link: Some("https://meet.scholar.test/abc".into()),
                staff_id,
            },
        )
        .await
        .expect("schedule class")
    }
}
