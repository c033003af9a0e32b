use chrono::NaiveTime;
use derive_more::Display;

use crate::model::attendance::CheckStatus;

/// Work-day thresholds. Injected from `Config`, never hard-coded in
/// handlers; the 09:00/18:00 defaults match the historical behavior.
#[derive(Debug, Copy, Clone)]
pub struct AttendancePolicy {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }
    }
}

#[derive(Debug, Display, Eq, PartialEq)]
pub enum AttendanceError {
    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,
    #[display(fmt = "No active check-in found for today")]
    NotCheckedIn,
}

/// The per-(employee, day) attendance record as an explicit state machine:
/// NoEntry → Open → Closed. A closed day never reopens.
#[derive(Debug, Clone, PartialEq)]
pub enum DayAttendance {
    NoEntry,
    Open {
        check_in: NaiveTime,
    },
    Closed {
        check_in: NaiveTime,
        check_out: NaiveTime,
        overtime_hours: f64,
    },
}

impl DayAttendance {
    /// Rebuild the state from the raw row columns.
    pub fn from_row(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>, policy: &AttendancePolicy) -> Self {
        match (check_in, check_out) {
            (Some(check_in), Some(check_out)) => DayAttendance::Closed {
                check_in,
                check_out,
                overtime_hours: overtime_hours(check_out, policy),
            },
            (Some(check_in), None) => DayAttendance::Open { check_in },
            _ => DayAttendance::NoEntry,
        }
    }

    pub fn check_in(
        &self,
        at: NaiveTime,
        policy: &AttendancePolicy,
    ) -> Result<(DayAttendance, CheckStatus), AttendanceError> {
        match self {
            DayAttendance::NoEntry => {
                Ok((DayAttendance::Open { check_in: at }, check_in_status(at, policy)))
            }
            _ => Err(AttendanceError::AlreadyCheckedIn),
        }
    }

    pub fn check_out(&self, at: NaiveTime, policy: &AttendancePolicy) -> Result<DayAttendance, AttendanceError> {
        match self {
            DayAttendance::Open { check_in } => Ok(DayAttendance::Closed {
                check_in: *check_in,
                check_out: at,
                overtime_hours: overtime_hours(at, policy),
            }),
            _ => Err(AttendanceError::NotCheckedIn),
        }
    }
}

/// Late strictly after work start; exactly on the threshold is on time.
pub fn check_in_status(at: NaiveTime, policy: &AttendancePolicy) -> CheckStatus {
    if at > policy.work_start {
        CheckStatus::Late
    } else {
        CheckStatus::OnTime
    }
}

/// Hours worked past the configured end of day, rounded to 2 decimals.
/// Never negative.
pub fn overtime_hours(check_out: NaiveTime, policy: &AttendancePolicy) -> f64 {
    let seconds = (check_out - policy.work_end).num_seconds();
    if seconds <= 0 {
        return 0.0;
    }
    (seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn on_time_at_or_before_nine() {
        let policy = AttendancePolicy::default();
        assert_eq!(check_in_status(t(8, 45, 0), &policy), CheckStatus::OnTime);
        assert_eq!(check_in_status(t(9, 0, 0), &policy), CheckStatus::OnTime);
    }

    #[test]
    fn late_one_second_past_nine() {
        let policy = AttendancePolicy::default();
        assert_eq!(check_in_status(t(9, 0, 1), &policy), CheckStatus::Late);
    }

    #[test]
    fn no_overtime_before_work_end() {
        let policy = AttendancePolicy::default();
        assert_eq!(overtime_hours(t(17, 30, 0), &policy), 0.0);
        assert_eq!(overtime_hours(t(18, 0, 0), &policy), 0.0);
    }

    #[test]
    fn half_hour_overtime_at_half_past_six() {
        let policy = AttendancePolicy::default();
        assert_eq!(overtime_hours(t(18, 30, 0), &policy), 0.5);
    }

    #[test]
    fn overtime_rounds_to_two_decimals() {
        let policy = AttendancePolicy::default();
        // 18:05:00 -> 300s -> 0.0833.. -> 0.08
        assert_eq!(overtime_hours(t(18, 5, 0), &policy), 0.08);
    }

    #[test]
    fn full_day_transitions() {
        let policy = AttendancePolicy::default();
        let day = DayAttendance::NoEntry;

        let (day, status) = day.check_in(t(9, 0, 0), &policy).unwrap();
        assert_eq!(status, CheckStatus::OnTime);
        assert_eq!(day, DayAttendance::Open { check_in: t(9, 0, 0) });

        let day = day.check_out(t(18, 30, 0), &policy).unwrap();
        match day {
            DayAttendance::Closed { overtime_hours, .. } => assert_eq!(overtime_hours, 0.5),
            other => panic!("expected closed day, got {:?}", other),
        }
    }

    #[test]
    fn double_check_in_rejected() {
        let policy = AttendancePolicy::default();
        let day = DayAttendance::Open { check_in: t(9, 0, 0) };
        assert_eq!(
            day.check_in(t(10, 0, 0), &policy),
            Err(AttendanceError::AlreadyCheckedIn)
        );
    }

    #[test]
    fn check_out_requires_open_entry() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            DayAttendance::NoEntry.check_out(t(18, 0, 0), &policy),
            Err(AttendanceError::NotCheckedIn)
        );

        let closed = DayAttendance::Closed {
            check_in: t(9, 0, 0),
            check_out: t(18, 0, 0),
            overtime_hours: 0.0,
        };
        // no transition undoes a checkout
        assert_eq!(closed.check_out(t(19, 0, 0), &policy), Err(AttendanceError::NotCheckedIn));
    }

    #[test]
    fn state_rebuilds_from_row_columns() {
        let policy = AttendancePolicy::default();
        assert_eq!(DayAttendance::from_row(None, None, &policy), DayAttendance::NoEntry);
        assert_eq!(
            DayAttendance::from_row(Some(t(9, 0, 0)), None, &policy),
            DayAttendance::Open { check_in: t(9, 0, 0) }
        );
    }
}
