//! Canonical attendance status derivation.
//!
//! Every reporting path (per-user reports, combined class reports, timetables)
//! reduces to [`AttendanceStatus::derive`]; there is deliberately no second
//! status function anywhere in the codebase.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Minutes after the scheduled start at which a punch-in stops counting as on time.
pub const LATE_THRESHOLD_MINUTES: i64 = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttendanceStatus {
    OnTime,
    Late,
    Partial,
    Absent,
}

impl AttendanceStatus {
    /// Classifies a punch pair against the class's scheduled start.
    ///
    /// - both punches present: `late` if the punch-in trails the scheduled
    ///   start by more than [`LATE_THRESHOLD_MINUTES`], otherwise `on_time`
    /// - punch-in only: `partial`
    /// - no punch-in: `absent`
    pub fn derive(
        scheduled_start: DateTime<Utc>,
        punch_in: Option<DateTime<Utc>>,
        punch_out: Option<DateTime<Utc>>,
    ) -> Self {
        match (punch_in, punch_out) {
            (Some(arrived), Some(_)) => {
                if arrived - scheduled_start > Duration::minutes(LATE_THRESHOLD_MINUTES) {
                    AttendanceStatus::Late
                } else {
                    AttendanceStatus::OnTime
                }
            }
            (Some(_), None) => AttendanceStatus::Partial,
            _ => AttendanceStatus::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, h, m, s).unwrap()
    }

    #[test]
    fn exactly_five_minutes_is_still_on_time() {
        let status = AttendanceStatus::derive(at(10, 0, 0), Some(at(10, 5, 0)), Some(at(10, 50, 0)));
        assert_eq!(status, AttendanceStatus::OnTime);
    }

    #[test]
    fn one_second_past_threshold_is_late() {
        let status = AttendanceStatus::derive(at(10, 0, 0), Some(at(10, 5, 1)), Some(at(10, 50, 0)));
        assert_eq!(status, AttendanceStatus::Late);
    }

    #[test]
    fn early_arrival_is_on_time() {
        let status = AttendanceStatus::derive(at(10, 0, 0), Some(at(9, 55, 0)), Some(at(11, 0, 0)));
        assert_eq!(status, AttendanceStatus::OnTime);
    }

    #[test]
    fn punch_in_without_punch_out_is_partial() {
        let status = AttendanceStatus::derive(at(10, 0, 0), Some(at(10, 2, 0)), None);
        assert_eq!(status, AttendanceStatus::Partial);
    }

    #[test]
    fn no_punches_is_absent() {
        let status = AttendanceStatus::derive(at(10, 0, 0), None, None);
        assert_eq!(status, AttendanceStatus::Absent);
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::OnTime).unwrap(),
            "\"on_time\""
        );
        assert_eq!(AttendanceStatus::Late.to_string(), "late");
    }
}
