//! Axum route handlers for the career tools.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::career::interview::{generate_interview_plan, InterviewPlan};
use crate::career::job_details::{parse_job_details, JobDetails};
use crate::career::resume::{extract_resume_text, tailor_resume, ResumeTailoring, TailorInput};
use crate::career::salary::{estimate_salary, SalaryInsights, SalaryQuery};
use crate::errors::AppError;
use crate::identity::RequestContext;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobDetailsRequest {
    pub job_text: String,
}

/// Either raw posting text or already-parsed details. Parsed details win.
#[derive(Debug, Deserialize)]
pub struct InterviewPlanRequest {
    #[serde(default)]
    pub job_text: Option<String>,
    #[serde(default)]
    pub job_details: Option<JobDetails>,
}

#[derive(Debug, Serialize)]
pub struct InterviewPlanResponse {
    pub job_details: JobDetails,
    pub plan: InterviewPlan,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/career/job-details
pub async fn handle_job_details(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Json(request): Json<JobDetailsRequest>,
) -> Result<Json<JobDetails>, AppError> {
    let details = parse_job_details(&request.job_text, &state.oracle).await?;
    Ok(Json(details))
}

/// POST /api/v1/career/interview-plan
///
/// Parse → plan, in that order, when only posting text is supplied.
pub async fn handle_interview_plan(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Json(request): Json<InterviewPlanRequest>,
) -> Result<Json<InterviewPlanResponse>, AppError> {
    let job_details = match (request.job_details, request.job_text) {
        (Some(details), _) => details,
        (None, Some(text)) => parse_job_details(&text, &state.oracle).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "either job_text or job_details is required".to_string(),
            ))
        }
    };

    let plan = generate_interview_plan(&job_details, &state.oracle).await?;
    Ok(Json(InterviewPlanResponse { job_details, plan }))
}

/// POST /api/v1/career/salary-insights
pub async fn handle_salary_insights(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Json(query): Json<SalaryQuery>,
) -> Result<Json<SalaryInsights>, AppError> {
    let insights = estimate_salary(&query, &state.oracle).await?;
    Ok(Json(insights))
}

/// POST /api/v1/career/resume/tailor
///
/// Multipart fields: `resume` (PDF file) or `resume_text`, plus `job_text`.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    _ctx: RequestContext,
    mut multipart: Multipart,
) -> Result<Json<ResumeTailoring>, AppError> {
    let mut resume_text: Option<String> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume_text = Some(extract_resume_text(bytes).await?);
            }
            "resume_text" => resume_text = Some(read_text_field(field).await?),
            "job_text" => job_text = Some(read_text_field(field).await?),
            _ => {}
        }
    }

    let input = TailorInput {
        resume_text: resume_text
            .ok_or_else(|| AppError::Validation("resume or resume_text is required".to_string()))?,
        job_text: job_text
            .ok_or_else(|| AppError::Validation("job_text is required".to_string()))?,
    };

    let tailoring = tailor_resume(&input, &state.oracle).await?;
    Ok(Json(tailoring))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid text field: {e}")))
}
