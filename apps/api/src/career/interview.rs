//! Interview plan generation. Runs on parsed job details, so callers sequence
//! `parse_job_details` first.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::career::job_details::JobDetails;
use crate::career::prompts::{INTERVIEW_PLAN_PROMPT_TEMPLATE, INTERVIEW_PLAN_SYSTEM};
use crate::errors::AppError;
use crate::oracle::prompts::{fill_template, to_prompt_json, NO_FABRICATION_INSTRUCTION};
use crate::oracle::{OracleClient, OracleError, Template};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRound {
    pub name: String,
    pub focus: String,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub preparation_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewPlan {
    pub rounds: Vec<InterviewRound>,
    #[serde(default)]
    pub study_topics: Vec<String>,
}

pub struct GenerateInterviewPlan;

impl Template for GenerateInterviewPlan {
    const NAME: &'static str = "interview_plan";
    const SYSTEM: &'static str = INTERVIEW_PLAN_SYSTEM;
    type Input = JobDetails;
    type Output = InterviewPlan;

    fn render(input: &JobDetails) -> Result<String, OracleError> {
        let details_json = to_prompt_json(input)?;
        Ok(fill_template(
            INTERVIEW_PLAN_PROMPT_TEMPLATE,
            &[
                ("no_fabrication", NO_FABRICATION_INSTRUCTION),
                ("job_details_json", &details_json),
            ],
        ))
    }
}

pub async fn generate_interview_plan(
    details: &JobDetails,
    oracle: &OracleClient,
) -> Result<InterviewPlan, AppError> {
    let plan = oracle
        .invoke::<GenerateInterviewPlan>(details)
        .await
        .map_err(|e| AppError::Oracle(format!("Interview plan generation failed: {e}")))?;
    validate_plan(&plan)?;
    info!(
        "Interview plan for '{}': {} rounds",
        details.title,
        plan.rounds.len()
    );
    Ok(plan)
}

/// A plan with no rounds, or a round with no questions, is not a usable result.
fn validate_plan(plan: &InterviewPlan) -> Result<(), AppError> {
    if plan.rounds.is_empty() {
        return Err(AppError::Oracle("Interview plan has no rounds".to_string()));
    }
    if let Some(round) = plan.rounds.iter().find(|r| r.questions.is_empty()) {
        return Err(AppError::Oracle(format!(
            "Interview round '{}' has no questions",
            round.name
        )));
    }
    Ok(())
}
