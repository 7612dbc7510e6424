pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::career::handlers as career;
use crate::state::AppState;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Task tracker
        .route(
            "/api/v1/tasks",
            get(tracker::handle_list_tasks).post(tracker::handle_create_task),
        )
        .route("/api/v1/tasks/activity", get(tracker::handle_day_activity))
        .route("/api/v1/tasks/timeline", get(tracker::handle_timeline))
        .route(
            "/api/v1/tasks/summary/notify",
            post(tracker::handle_notify_summary),
        )
        .route(
            "/api/v1/tasks/:id",
            patch(tracker::handle_update_task).delete(tracker::handle_delete_task),
        )
        .route(
            "/api/v1/tasks/:id/reschedule",
            post(tracker::handle_reschedule_task),
        )
        // Career tools
        .route("/api/v1/career/job-details", post(career::handle_job_details))
        .route(
            "/api/v1/career/interview-plan",
            post(career::handle_interview_plan),
        )
        .route(
            "/api/v1/career/salary-insights",
            post(career::handle_salary_insights),
        )
        .route(
            "/api/v1/career/resume/tailor",
            post(career::handle_tailor_resume),
        )
        .with_state(state)
}
