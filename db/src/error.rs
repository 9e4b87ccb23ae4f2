//! Domain error taxonomy shared by the scheduler and attendance engine.
//!
//! Every variant except `Storage` is a caller-recoverable rejection; `Storage`
//! wraps an unclassified persistence failure.

use sea_orm::{DbErr, SqlErr};
use strum::Display;
use thiserror::Error;

/// Which party of a one-to-one class owns a scheduling conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConflictParty {
    Teacher,
    Student,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RoleMismatch(String),

    #[error("{party} has a scheduling conflict at this time")]
    SchedulingConflict { party: ConflictParty },

    #[error("{0}")]
    Forbidden(String),

    #[error("User has already punched in for this class")]
    DuplicatePunchIn,

    #[error("User has already punched out for this class")]
    DuplicatePunchOut,

    #[error("User must punch in before punching out")]
    PunchOutBeforePunchIn,

    #[error("{0}")]
    Uniqueness(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(party: ConflictParty) -> Self {
        Self::SchedulingConflict { party }
    }
}

/// True when the underlying driver rejected a write for violating a UNIQUE
/// constraint. Used to resolve races the pre-checks cannot (two concurrent
/// punch-ins, duplicate email/alias inserts).
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
