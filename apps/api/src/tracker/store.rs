//! Task persistence. `TaskStore` is the seam between the tracker and the document store.
//!
//! Writes are scoped to the task's `user_id`; telling a foreign task apart from
//! a missing one (`Forbidden` vs `NotFound`) is left to `tracker::service`.
//! Neither write path can clear a stored completion, so racing requests never
//! turn a completed task back into a missed one.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::task::{Task, TaskRow};

/// Carried in `AppState` as `Arc<dyn TaskStore>`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError>;
    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError>;
    async fn insert(&self, task: &Task) -> Result<(), AppError>;
    /// Writes the title and completion of `task` and returns the stored row.
    /// A stored `completed = true` survives a save of `false`.
    async fn save(&self, task: &Task) -> Result<Task, AppError>;
    /// Writes the date and reschedule record of `task` and returns the stored
    /// row. Rejected with `Validation` once the stored task is completed.
    async fn reschedule(&self, task: &Task) -> Result<Task, AppError>;
    async fn remove(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks WHERE user_id = $1 ORDER BY date, created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Task::from))
    }

    async fn insert(&self, task: &Task) -> Result<(), AppError> {
        let (original_date, reason) = reschedule_columns(task);
        sqlx::query(
            r#"
            INSERT INTO tasks
                (id, user_id, title, date, completed, original_date, reschedule_reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(task.date)
        .bind(task.completed)
        .bind(original_date)
        .bind(reason)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, task: &Task) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET title = $3, completed = completed OR $4
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(task.completed)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from)
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task.id)))
    }

    async fn reschedule(&self, task: &Task) -> Result<Task, AppError> {
        let (original_date, reason) = reschedule_columns(task);
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET date = $3, original_date = $4, reschedule_reason = $5
            WHERE id = $1 AND user_id = $2 AND completed = false
            RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(task.date)
        .bind(original_date)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Task::from(row)),
            None => match self.find(task.id).await? {
                Some(current) if current.user_id == task.user_id => Err(completed_error(task.id)),
                _ => Err(AppError::NotFound(format!("Task {} not found", task.id))),
            },
        }
    }

    async fn remove(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn completed_error(id: Uuid) -> AppError {
    AppError::Validation(format!("Task {id} is completed and cannot be rescheduled"))
}

fn reschedule_columns(task: &Task) -> (Option<chrono::NaiveDate>, Option<&str>) {
    match &task.rescheduled {
        Some(r) => (Some(r.original_date), Some(r.reason.as_str())),
        None => (None, None),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

/// In-process store used when no `DATABASE_URL` is configured, and by tests.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(owned)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn insert(&self, task: &Task) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::Validation(format!(
                "Task {} already exists",
                task.id
            )));
        }
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn save(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let slot = owned_slot(&mut tasks, task)?;
        slot.title = task.title.clone();
        slot.completed |= task.completed;
        Ok(slot.clone())
    }

    async fn reschedule(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let slot = owned_slot(&mut tasks, task)?;
        if slot.completed {
            return Err(completed_error(task.id));
        }
        slot.date = task.date;
        slot.rescheduled = task.rescheduled.clone();
        Ok(slot.clone())
    }

    async fn remove(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().await;
        if tasks.get(&id).is_some_and(|t| t.user_id == user_id) {
            tasks.remove(&id);
        }
        Ok(())
    }
}

fn owned_slot<'a>(
    tasks: &'a mut HashMap<Uuid, Task>,
    task: &Task,
) -> Result<&'a mut Task, AppError> {
    tasks
        .get_mut(&task.id)
        .filter(|slot| slot.user_id == task.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task.id)))
}
