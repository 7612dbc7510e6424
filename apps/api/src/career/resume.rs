//! Resume tailoring: scores a resume against a posting and suggests rewrites.
//!
//! Resumes arrive either as raw text or as an uploaded PDF; PDFs are converted
//! with `pdf-extract` on the blocking pool.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::career::prompts::{TAILOR_RESUME_PROMPT_TEMPLATE, TAILOR_RESUME_SYSTEM};
use crate::errors::AppError;
use crate::oracle::prompts::{fill_template, NO_FABRICATION_INSTRUCTION};
use crate::oracle::{OracleClient, OracleError, Template};

/// Resume text beyond this many characters is dropped before prompting.
const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorInput {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeTailoring {
    pub match_score: u8,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggested_bullets: Vec<String>,
    pub summary: String,
}

pub struct TailorResume;

impl Template for TailorResume {
    const NAME: &'static str = "tailor_resume";
    const SYSTEM: &'static str = TAILOR_RESUME_SYSTEM;
    type Input = TailorInput;
    type Output = ResumeTailoring;

    fn render(input: &TailorInput) -> Result<String, OracleError> {
        let resume_text = truncate_chars(input.resume_text.trim(), MAX_RESUME_CHARS);
        Ok(fill_template(
            TAILOR_RESUME_PROMPT_TEMPLATE,
            &[
                ("no_fabrication", NO_FABRICATION_INSTRUCTION),
                ("resume_text", &resume_text),
                ("job_text", input.job_text.trim()),
            ],
        ))
    }
}

/// Extracts plain text from an uploaded PDF.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, AppError> {
    // pdf-extract panics on some malformed files; a panicked task is an unreadable upload.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| {
            warn!("PDF extraction task aborted: {e}");
            AppError::Validation("resume could not be read as a PDF".to_string())
        })?
        .map_err(|e| {
            warn!("Could not read uploaded resume PDF: {e:?}");
            AppError::Validation("resume could not be read as a PDF".to_string())
        })?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(AppError::Validation(
            "resume PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

pub async fn tailor_resume(
    input: &TailorInput,
    oracle: &OracleClient,
) -> Result<ResumeTailoring, AppError> {
    if input.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume cannot be empty".to_string()));
    }
    if input.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let tailoring = oracle
        .invoke::<TailorResume>(input)
        .await
        .map_err(|e| AppError::Oracle(format!("Resume tailoring failed: {e}")))?;

    if tailoring.match_score > 100 {
        return Err(AppError::Oracle(format!(
            "Resume match score {} is out of range",
            tailoring.match_score
        )));
    }
    info!(
        "Resume tailored: match_score={}, {} missing keywords",
        tailoring.match_score,
        tailoring.missing_keywords.len()
    );
    Ok(tailoring)
}

/// Collapses runs of blank lines and trailing spaces left by PDF extraction.
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace_drops_blank_lines() {
        let raw = "Jane Doe   \n\n\n  \nSoftware Engineer\n";
        assert_eq!(normalize_whitespace(raw), "Jane Doe\nSoftware Engineer");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_render_truncates_long_resume() {
        let input = TailorInput {
            resume_text: "x".repeat(MAX_RESUME_CHARS + 500),
            job_text: "Rust engineer".to_string(),
        };
        let prompt = TailorResume::render(&input).unwrap();
        assert!(!prompt.contains(&"x".repeat(MAX_RESUME_CHARS + 1)));
        assert!(prompt.contains("JOB POSTING:\nRust engineer"));
    }

    #[test]
    fn test_render_keeps_placeholder_text_in_resume_literal() {
        let input = TailorInput {
            resume_text: "Built a templating engine using {job_text} markers".to_string(),
            job_text: "Staff engineer at Initech".to_string(),
        };
        let prompt = TailorResume::render(&input).unwrap();
        assert!(prompt.contains("Built a templating engine using {job_text} markers"));
        assert_eq!(prompt.matches("Staff engineer at Initech").count(), 1);
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_a_validation_error() {
        let result = extract_resume_text(Bytes::from_static(b"not a pdf")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_resume_is_rejected_before_calling_oracle() {
        let oracle = OracleClient::new(vec!["sk-test".to_string()]).unwrap();
        let input = TailorInput {
            resume_text: " ".to_string(),
            job_text: "Rust engineer".to_string(),
        };
        assert!(matches!(
            tailor_resume(&input, &oracle).await,
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_output_deserializes() {
        let tailoring: ResumeTailoring = serde_json::from_str(
            r#"{"match_score": 64, "missing_keywords": ["gRPC"], "summary": "Solid."}"#,
        )
        .unwrap();
        assert_eq!(tailoring.match_score, 64);
        assert!(tailoring.suggested_bullets.is_empty());
    }
}
