use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A unit of planned work for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// The day the task is currently scheduled for.
    pub date: NaiveDate,
    pub completed: bool,
    /// Present iff `date` was changed at least once after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled: Option<Reschedule>,
    pub created_at: DateTime<Utc>,
}

/// Rescheduling record. `original_date` is the first day the task was ever
/// scheduled for; `reason` is the reason given for the most recent move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reschedule {
    pub original_date: NaiveDate,
    pub reason: String,
}

/// Flat row shape of the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub original_date: Option<NaiveDate>,
    pub reschedule_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let rescheduled = row.original_date.map(|original_date| Reschedule {
            original_date,
            reason: row.reschedule_reason.unwrap_or_default(),
        });
        Task {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            date: row.date,
            completed: row.completed,
            rescheduled,
            created_at: row.created_at,
        }
    }
}

impl Task {
    /// The day this task originated on, if it has been moved since.
    pub fn original_date(&self) -> Option<NaiveDate> {
        self.rescheduled.as_ref().map(|r| r.original_date)
    }
}
