use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, DatabaseConnection, DbErr, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{DomainError, is_unique_violation};

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Global role of this user.
    pub role: Role,
    /// Unique display name.
    pub alias: String,
    /// User's unique email address.
    pub email: String,
    /// Securely hashed password string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// Global user role. Stored as a string column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "staff")]
    Staff,

    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Partial update for a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub role: Option<Role>,
    pub alias: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.alias.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}

impl Model {
    /// Hashes a plaintext password with argon2 and a random salt.
    pub fn hash_password(password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::Storage(DbErr::Custom(format!("password hash: {e}"))))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against this user's stored hash.
    ///
    /// An unparsable stored hash verifies as false rather than erroring, so a
    /// corrupted row cannot be logged into.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Creates a user, rejecting duplicate email or alias.
    pub async fn create(
        db: &DatabaseConnection,
        role: Role,
        alias: &str,
        email: &str,
        password: &str,
    ) -> Result<Model, DomainError> {
        if Entity::find()
            .filter(Column::Email.eq(email))
            .one(db)
            .await?
            .is_some()
        {
            return Err(DomainError::Uniqueness(
                "A user with this email already exists".into(),
            ));
        }
        if Entity::find()
            .filter(Column::Alias.eq(alias))
            .one(db)
            .await?
            .is_some()
        {
            return Err(DomainError::Uniqueness(
                "A user with this alias already exists".into(),
            ));
        }

        let password_hash = Self::hash_password(password)?;

        let active = ActiveModel {
            role: Set(role),
            alias: Set(alias.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                // Lost a race against a concurrent insert of the same email/alias.
                DomainError::Uniqueness("A user with this email or alias already exists".into())
            } else {
                DomainError::Storage(e)
            }
        })
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<Option<Model>, DomainError> {
        Ok(Entity::find_by_id(user_id).one(db).await?)
    }

    /// Fetches a user or fails with `NotFound`.
    pub async fn get(db: &DatabaseConnection, user_id: i64) -> Result<Model, DomainError> {
        Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {user_id} not found")))
    }

    pub async fn get_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<Model>, DomainError> {
        Ok(Entity::find()
            .filter(Column::Email.eq(email))
            .one(db)
            .await?)
    }

    /// Lists users newest-first with the total count for pagination.
    pub async fn list(
        db: &DatabaseConnection,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Model>, u64), DomainError> {
        let paginator = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((users, total))
    }

    pub async fn list_by_role(
        db: &DatabaseConnection,
        role: Role,
    ) -> Result<Vec<Model>, DomainError> {
        Ok(Entity::find()
            .filter(Column::Role.eq(role))
            .order_by_asc(Column::Alias)
            .all(db)
            .await?)
    }

    /// Applies a partial update, re-checking email/alias uniqueness against
    /// other users when those fields are supplied.
    pub async fn update(
        db: &DatabaseConnection,
        user_id: i64,
        patch: UserPatch,
    ) -> Result<Model, DomainError> {
        let existing = Self::get(db, user_id).await?;

        if patch.is_empty() {
            return Ok(existing);
        }

        if let Some(email) = &patch.email {
            let taken = Entity::find()
                .filter(Column::Email.eq(email.as_str()))
                .filter(Column::Id.ne(user_id))
                .one(db)
                .await?;
            if taken.is_some() {
                return Err(DomainError::Uniqueness(
                    "Email already taken by another user".into(),
                ));
            }
        }
        if let Some(alias) = &patch.alias {
            let taken = Entity::find()
                .filter(Column::Alias.eq(alias.as_str()))
                .filter(Column::Id.ne(user_id))
                .one(db)
                .await?;
            if taken.is_some() {
                return Err(DomainError::Uniqueness(
                    "Alias already taken by another user".into(),
                ));
            }
        }

        let mut active: ActiveModel = existing.into();
        if let Some(role) = patch.role {
            active.role = Set(role);
        }
        if let Some(alias) = patch.alias {
            active.alias = Set(alias);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(password) = patch.password {
            active.password_hash = Set(Self::hash_password(&password)?);
        }

        active.update(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Uniqueness("A user with this email or alias already exists".into())
            } else {
                DomainError::Storage(e)
            }
        })
    }

    /// Deletes a user, refusing while any class or attendance row references them.
    pub async fn delete(db: &DatabaseConnection, user_id: i64) -> Result<(), DomainError> {
        Self::get(db, user_id).await?;

        let class_count = super::class::Entity::find()
            .filter(
                Condition::any()
                    .add(super::class::Column::TeacherId.eq(user_id))
                    .add(super::class::Column::StudentId.eq(user_id)),
            )
            .count(db)
            .await?;
        let attendance_count = super::attendance::Entity::find()
            .filter(super::attendance::Column::UserId.eq(user_id))
            .count(db)
            .await?;

        if class_count > 0 || attendance_count > 0 {
            return Err(DomainError::Validation(
                "Cannot delete user with existing classes or attendance records".into(),
            ));
        }

        Entity::delete_by_id(user_id).exec(db).await?;
        Ok(())
    }
}
