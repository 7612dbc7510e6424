use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::task::{Reschedule, Task};

/// Moves `task` to `new_date`, returning the updated task.
///
/// `original_date` records the first day the task was ever scheduled for and is
/// kept across a chain of moves; `reason` always holds the latest reason.
pub fn apply_reschedule(task: &Task, new_date: NaiveDate, reason: &str) -> Result<Task, AppError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::Validation(
            "reason cannot be empty when rescheduling".to_string(),
        ));
    }
    if task.completed {
        return Err(AppError::Validation(format!(
            "Task {} is already completed and cannot be rescheduled",
            task.id
        )));
    }
    if task.date == new_date {
        return Err(AppError::Validation(format!(
            "Task {} is already scheduled for {new_date}",
            task.id
        )));
    }

    let original_date = task.original_date().unwrap_or(task.date);

    Ok(Task {
        date: new_date,
        rescheduled: Some(Reschedule {
            original_date,
            reason: reason.to_string(),
        }),
        ..task.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::ledger::fixtures::{day, task};

    #[test]
    fn test_first_reschedule_records_origin() {
        let original = task(day(10), false);
        let moved = apply_reschedule(&original, day(12), "conflict").unwrap();

        assert_eq!(moved.id, original.id);
        assert_eq!(moved.date, day(12));
        let record = moved.rescheduled.unwrap();
        assert_eq!(record.original_date, day(10));
        assert_eq!(record.reason, "conflict");
    }

    #[test]
    fn test_chain_keeps_first_origin_and_latest_reason() {
        let original = task(day(10), false);
        let once = apply_reschedule(&original, day(12), "conflict").unwrap();
        let twice = apply_reschedule(&once, day(14), "  sick day ").unwrap();

        let record = twice.rescheduled.unwrap();
        assert_eq!(twice.date, day(14));
        assert_eq!(record.original_date, day(10));
        assert_eq!(record.reason, "sick day");
    }

    #[test]
    fn test_same_day_is_rejected() {
        let original = task(day(10), false);
        assert!(matches!(
            apply_reschedule(&original, day(10), "conflict"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_completed_task_is_rejected() {
        let done = task(day(10), true);
        assert!(matches!(
            apply_reschedule(&done, day(11), "conflict"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_reason_is_rejected() {
        let original = task(day(10), false);
        assert!(matches!(
            apply_reschedule(&original, day(11), "   "),
            Err(AppError::Validation(_))
        ));
    }
}
