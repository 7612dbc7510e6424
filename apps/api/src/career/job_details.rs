//! Job posting parser: extracts title, seniority and skills from raw posting text.

use serde::{Deserialize, Serialize};

use crate::career::prompts::{JOB_DETAILS_PROMPT_TEMPLATE, JOB_DETAILS_SYSTEM};
use crate::errors::AppError;
use crate::oracle::prompts::{fill_template, NO_FABRICATION_INSTRUCTION};
use crate::oracle::{OracleClient, OracleError, Template};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "unknown_seniority")]
    pub seniority: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

fn unknown_seniority() -> String {
    "unknown".to_string()
}

pub struct ParseJobDetails;

impl Template for ParseJobDetails {
    const NAME: &'static str = "parse_job_details";
    const SYSTEM: &'static str = JOB_DETAILS_SYSTEM;
    type Input = JobPosting;
    type Output = JobDetails;

    fn render(input: &JobPosting) -> Result<String, OracleError> {
        Ok(fill_template(
            JOB_DETAILS_PROMPT_TEMPLATE,
            &[
                ("no_fabrication", NO_FABRICATION_INSTRUCTION),
                ("job_text", input.job_text.trim()),
            ],
        ))
    }
}

/// Parses a job posting via the oracle.
pub async fn parse_job_details(job_text: &str, oracle: &OracleClient) -> Result<JobDetails, AppError> {
    if job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let input = JobPosting {
        job_text: job_text.to_string(),
    };
    let details = oracle
        .invoke::<ParseJobDetails>(&input)
        .await
        .map_err(|e| AppError::Oracle(format!("Job details parsing failed: {e}")))?;

    if details.title.trim().is_empty() {
        return Err(AppError::Oracle(
            "Job details parsing returned no title".to_string(),
        ));
    }
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_posting() {
        let prompt = ParseJobDetails::render(&JobPosting {
            job_text: "  Staff SRE at Globex  ".to_string(),
        })
        .unwrap();
        assert!(prompt.contains("JOB POSTING:\nStaff SRE at Globex"));
        assert!(prompt.contains(NO_FABRICATION_INSTRUCTION));
        assert!(!prompt.contains("{job_text}"));
    }

    #[test]
    fn test_minimal_output_uses_defaults() {
        let details: JobDetails = serde_json::from_str(r#"{"title": "Data Engineer"}"#).unwrap();
        assert_eq!(details.seniority, "unknown");
        assert!(details.company.is_none());
        assert!(details.required_skills.is_empty());
    }

    #[test]
    fn test_full_output_deserializes() {
        let details: JobDetails = serde_json::from_str(
            r#"{
                "title": "Senior Backend Engineer",
                "company": "Acme",
                "location": "Berlin",
                "seniority": "senior",
                "required_skills": ["Rust", "PostgreSQL"],
                "nice_to_have_skills": ["Kafka"],
                "responsibilities": ["Own payments"]
            }"#,
        )
        .unwrap();
        assert_eq!(details.company.as_deref(), Some("Acme"));
        assert_eq!(details.required_skills.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_posting_is_rejected_before_calling_oracle() {
        let oracle = OracleClient::new(vec!["sk-test".to_string()]).unwrap();
        let result = parse_job_details("   ", &oracle).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
