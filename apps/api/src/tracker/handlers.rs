//! Axum route handlers for the task tracker.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::RequestContext;
use crate::models::task::Task;
use crate::notify::{format_day_summary, Destination, SendOutcome};
use crate::state::AppState;
use crate::tracker::ledger::{compute_activity_for_date, DayActivity};
use crate::tracker::service::{self, NewTask, RescheduleRequest, TaskPatch};
use crate::tracker::timeline::{build_timeline, date_range, Timeline, ViewMode};

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub view: ViewMode,
    /// Defaults to today.
    pub anchor: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NotifySummaryRequest {
    pub date: NaiveDate,
    pub destination: Destination,
}

/// GET /api/v1/tasks
pub async fn handle_list_tasks(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Json<Vec<Task>> {
    Json(service::list_tasks(state.store.as_ref(), &ctx).await)
}

/// POST /api/v1/tasks
pub async fn handle_create_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = service::create_task(state.store.as_ref(), &ctx, request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/v1/tasks/:id
pub async fn handle_update_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, AppError> {
    let task = service::update_task(state.store.as_ref(), &ctx, id, patch).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/:id
pub async fn handle_delete_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_task(state.store.as_ref(), &ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tasks/:id/reschedule
pub async fn handle_reschedule_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Task>, AppError> {
    let task = service::reschedule_task(state.store.as_ref(), &ctx, id, request).await?;
    Ok(Json(task))
}

/// GET /api/v1/tasks/activity?date=YYYY-MM-DD
pub async fn handle_day_activity(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ActivityQuery>,
) -> Json<DayActivity> {
    let all_tasks = service::list_tasks(state.store.as_ref(), &ctx).await;
    Json(compute_activity_for_date(query.date, &all_tasks, Utc::now()))
}

/// GET /api/v1/tasks/timeline?view=week&anchor=YYYY-MM-DD
pub async fn handle_timeline(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Timeline>, AppError> {
    let now = Utc::now();
    let anchor = query.anchor.unwrap_or_else(|| now.date_naive());
    let all_tasks = service::list_tasks(state.store.as_ref(), &ctx).await;
    let range = date_range(query.view, anchor, &all_tasks)?;
    Ok(Json(build_timeline(query.view, range, &all_tasks, now)))
}

/// POST /api/v1/tasks/summary/notify
///
/// Delivery failures come back as `success: false`, never as an error status.
pub async fn handle_notify_summary(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<NotifySummaryRequest>,
) -> Json<SendOutcome> {
    let all_tasks = service::list_tasks(state.store.as_ref(), &ctx).await;
    let activity = compute_activity_for_date(request.date, &all_tasks, Utc::now());
    let message = format_day_summary(request.date, &activity);
    Json(state.notifier.send(&message, &request.destination).await)
}
