use chrono::NaiveDate;
use std::str::FromStr;

use crate::model::task::TaskStatus;

/// Progress drives the stored status: 0 means untouched, 100 means done,
/// anything in between is in progress.
pub fn status_for_progress(progress: u8) -> TaskStatus {
    match progress {
        0 => TaskStatus::NotStarted,
        100 => TaskStatus::Completed,
        _ => TaskStatus::InProgress,
    }
}

/// `overdue` is derived at read time, never stored: a task past its due
/// date that is not completed reads as overdue regardless of the stored
/// status.
pub fn effective_status(stored: TaskStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> TaskStatus {
    if stored != TaskStatus::Completed {
        if let Some(due) = due_date {
            if due < today {
                return TaskStatus::Overdue;
            }
        }
    }
    stored
}

/// Statuses a client may write through `PUT /tasks/{id}/status`.
/// `overdue` is rejected because it is derived, not set.
pub fn parse_settable_status(raw: &str) -> Option<TaskStatus> {
    match TaskStatus::from_str(raw).ok()? {
        TaskStatus::Overdue => None,
        status => Some(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn progress_maps_to_status() {
        assert_eq!(status_for_progress(0), TaskStatus::NotStarted);
        assert_eq!(status_for_progress(50), TaskStatus::InProgress);
        assert_eq!(status_for_progress(100), TaskStatus::Completed);
    }

    #[test]
    fn past_due_incomplete_task_reads_overdue() {
        let today = d(2024, 6, 10);
        assert_eq!(
            effective_status(TaskStatus::InProgress, Some(d(2024, 6, 9)), today),
            TaskStatus::Overdue
        );
        assert_eq!(
            effective_status(TaskStatus::NotStarted, Some(d(2024, 6, 1)), today),
            TaskStatus::Overdue
        );
    }

    #[test]
    fn due_today_is_not_overdue() {
        let today = d(2024, 6, 10);
        assert_eq!(
            effective_status(TaskStatus::InProgress, Some(today), today),
            TaskStatus::InProgress
        );
    }

    #[test]
    fn completed_task_never_reads_overdue() {
        let today = d(2024, 6, 10);
        assert_eq!(
            effective_status(TaskStatus::Completed, Some(d(2024, 1, 1)), today),
            TaskStatus::Completed
        );
    }

    #[test]
    fn overdue_is_not_client_settable() {
        assert_eq!(parse_settable_status("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(parse_settable_status("completed"), Some(TaskStatus::Completed));
        assert_eq!(parse_settable_status("overdue"), None);
        assert_eq!(parse_settable_status("garbage"), None);
    }
}
