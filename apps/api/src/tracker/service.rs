//! Task operations scoped to the acting user.
//!
//! Every mutation loads the record first and rejects it with `Forbidden` unless
//! the caller owns it. The store then applies the change against the current
//! row, so a completion made by a concurrent request is never undone. List reads never fail: store errors are logged and
//! reported as an empty list.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::RequestContext;
use crate::models::task::Task;
use crate::tracker::reschedule::apply_reschedule;
use crate::tracker::store::TaskStore;

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub date: NaiveDate,
}

/// Partial update. `completed` may only move from false to true.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    pub reason: String,
}

pub async fn list_tasks(store: &dyn TaskStore, ctx: &RequestContext) -> Vec<Task> {
    match store.list_for_user(ctx.user_id).await {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("Failed to list tasks for user {}: {e}", ctx.user_id);
            Vec::new()
        }
    }
}

pub async fn create_task(
    store: &dyn TaskStore,
    ctx: &RequestContext,
    new_task: NewTask,
) -> Result<Task, AppError> {
    let title = validate_title(&new_task.title)?;
    let task = Task {
        id: Uuid::new_v4(),
        user_id: ctx.user_id,
        title,
        date: new_task.date,
        completed: false,
        rescheduled: None,
        created_at: Utc::now(),
    };
    store.insert(&task).await?;
    info!("Created task {} for user {} on {}", task.id, ctx.user_id, task.date);
    Ok(task)
}

pub async fn update_task(
    store: &dyn TaskStore,
    ctx: &RequestContext,
    id: Uuid,
    patch: TaskPatch,
) -> Result<Task, AppError> {
    let mut task = owned_task(store, ctx, id).await?;

    if let Some(title) = patch.title.as_deref() {
        task.title = validate_title(title)?;
    }
    match patch.completed {
        Some(true) => task.completed = true,
        Some(false) if task.completed => {
            return Err(AppError::Validation(format!(
                "Task {id} is completed and cannot be reopened"
            )));
        }
        _ => {}
    }

    let saved = store.save(&task).await?;
    info!("Updated task {id} for user {}", ctx.user_id);
    Ok(saved)
}

pub async fn reschedule_task(
    store: &dyn TaskStore,
    ctx: &RequestContext,
    id: Uuid,
    request: RescheduleRequest,
) -> Result<Task, AppError> {
    let task = owned_task(store, ctx, id).await?;
    let moved = apply_reschedule(&task, request.date, &request.reason)?;
    let saved = store.reschedule(&moved).await?;
    info!(
        "Rescheduled task {id} from {} to {} for user {}",
        task.date, saved.date, ctx.user_id
    );
    Ok(saved)
}

pub async fn delete_task(
    store: &dyn TaskStore,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<(), AppError> {
    owned_task(store, ctx, id).await?;
    store.remove(id, ctx.user_id).await?;
    info!("Deleted task {id} for user {}", ctx.user_id);
    Ok(())
}

async fn owned_task(
    store: &dyn TaskStore,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<Task, AppError> {
    let task = store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))?;
    if !ctx.owns(task.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(task)
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}
