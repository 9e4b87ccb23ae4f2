//! Authorization policy table.
//!
//! Every role-gated operation is listed here once, with the roles allowed to
//! invoke it and whether it may additionally be invoked on one's own
//! resources. Guards and handlers call [`evaluate`] instead of branching on
//! roles inline.

use db::models::user::Role;

use crate::auth::claims::Claims;

/// The operations exposed by the API, as gated units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ManageUsers,
    ViewUser,
    ManageClasses,
    ViewClass,
    ViewTimetable,
    ViewOwnTimetable,
    Punch,
    ViewOwnAttendance,
    ViewClassAttendance,
    AttendanceReport,
    CombinedReport,
    ViewUserStats,
}

/// Whether an operation is additionally allowed against the caller's own
/// user id, outside the role allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelfAccess {
    Never,
    OwnUserId,
}

struct Rule {
    allowed: &'static [Role],
    self_access: SelfAccess,
    deny_message: &'static str,
}

fn rule_for(operation: Operation) -> Rule {
    use Operation::*;
    use Role::*;
    match operation {
        ManageUsers => Rule {
            allowed: &[Admin],
            self_access: SelfAccess::Never,
            deny_message: "Admin access required",
        },
        ViewUser => Rule {
            allowed: &[Admin],
            self_access: SelfAccess::OwnUserId,
            deny_message: "Admin access required to view other users",
        },
        ManageClasses => Rule {
            allowed: &[Staff, Admin],
            self_access: SelfAccess::Never,
            deny_message: "Staff or admin access required",
        },
        ViewClass => Rule {
            allowed: &[Admin, Staff, Teacher, Student],
            self_access: SelfAccess::Never,
            deny_message: "Authentication required",
        },
        ViewTimetable => Rule {
            allowed: &[Staff, Admin],
            self_access: SelfAccess::OwnUserId,
            deny_message: "You can only view your own timetable",
        },
        ViewOwnTimetable => Rule {
            allowed: &[Teacher, Student],
            self_access: SelfAccess::Never,
            deny_message: "Only teachers and students have a timetable",
        },
        Punch => Rule {
            allowed: &[Teacher, Student],
            self_access: SelfAccess::Never,
            deny_message: "Only teachers and students can punch in or out",
        },
        ViewOwnAttendance => Rule {
            allowed: &[Teacher, Student],
            self_access: SelfAccess::Never,
            deny_message: "Only teachers and students have attendance records",
        },
        ViewClassAttendance => Rule {
            allowed: &[Staff, Admin],
            self_access: SelfAccess::Never,
            deny_message: "Staff or admin access required",
        },
        AttendanceReport => Rule {
            allowed: &[Admin],
            self_access: SelfAccess::Never,
            deny_message: "Admin access required for attendance reports",
        },
        CombinedReport => Rule {
            allowed: &[Admin],
            self_access: SelfAccess::Never,
            deny_message: "Admin access required for combined reports",
        },
        ViewUserStats => Rule {
            allowed: &[Staff, Admin],
            self_access: SelfAccess::OwnUserId,
            deny_message: "You can only view your own statistics",
        },
    }
}

/// The outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Evaluates the policy table for one operation.
///
/// `target_user` is the user id the operation acts on, where the operation
/// has one (timetables, stats, user lookup); it enables the self-access rule.
pub fn evaluate(operation: Operation, claims: &Claims, target_user: Option<i64>) -> Decision {
    let rule = rule_for(operation);

    if rule.allowed.contains(&claims.role) {
        return Decision::Allowed;
    }
    if rule.self_access == SelfAccess::OwnUserId && target_user == Some(claims.sub) {
        return Decision::Allowed;
    }
    Decision::Denied(rule.deny_message)
}
