// Oracle prompt templates for the career tools.
// JSON-only output is enforced by the oracle client; the `{no_fabrication}`
// placeholder is filled with `oracle::prompts::NO_FABRICATION_INSTRUCTION`.

pub const JOB_DETAILS_SYSTEM: &str = "You are an expert technical recruiter. \
    Extract the structured facts of a job posting.";

/// Replace `{no_fabrication}` and `{job_text}` before sending.
pub const JOB_DETAILS_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Extract the key details of the following job posting.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Senior Backend Engineer",
  "company": "Acme Corp" | null,
  "location": "Remote (EU)" | null,
  "seniority": "junior" | "mid" | "senior" | "staff" | "principal" | "unknown",
  "required_skills": ["Rust", "PostgreSQL"],
  "nice_to_have_skills": ["Kubernetes"],
  "responsibilities": ["Own the billing service end to end"]
}

JOB POSTING:
{job_text}"#;

pub const INTERVIEW_PLAN_SYSTEM: &str = "You are an experienced hiring manager \
    preparing a candidate for a structured interview loop.";

/// Replace `{no_fabrication}` and `{job_details_json}` before sending.
pub const INTERVIEW_PLAN_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Design an interview preparation plan for the role described below.

ROLE (parsed job details):
{job_details_json}

Return a JSON object with this EXACT schema:
{
  "rounds": [
    {
      "name": "Technical screen",
      "focus": "Core language fluency and debugging",
      "questions": ["Walk through how you would find a memory leak in a long-running service"],
      "preparation_tips": ["Review ownership and lifetimes"]
    }
  ],
  "study_topics": ["Distributed transactions"]
}

Rules:
- 3 to 5 rounds, ordered as a typical loop for this seniority
- 3 to 6 questions per round, specific to the listed skills and responsibilities"#;

pub const SALARY_SYSTEM: &str = "You are a compensation analyst with broad knowledge \
    of technology job markets.";

/// Replace `{no_fabrication}`, `{role}`, `{location}` and `{years_experience}` before sending.
pub const SALARY_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Estimate the annual base salary range for this profile.

ROLE: {role}
LOCATION: {location}
YEARS OF EXPERIENCE: {years_experience}

Return a JSON object with this EXACT schema:
{
  "currency": "EUR",
  "low": 55000,
  "median": 68000,
  "high": 82000,
  "market_notes": ["Demand for backend engineers in this region is stable"],
  "negotiation_tips": ["Anchor on total compensation, not base alone"]
}

Rules:
- low <= median <= high, all annual gross amounts in the local currency
- currency is an ISO 4217 code"#;

pub const TAILOR_RESUME_SYSTEM: &str = "You are an expert resume strategist who tailors \
    resumes to specific job postings without exaggerating the candidate's record.";

/// Replace `{no_fabrication}`, `{resume_text}` and `{job_text}` before sending.
pub const TAILOR_RESUME_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Compare the resume with the job posting and suggest how to tailor it.

RESUME:
{resume_text}

JOB POSTING:
{job_text}

Return a JSON object with this EXACT schema:
{
  "match_score": 72,
  "missing_keywords": ["Terraform"],
  "suggested_bullets": ["Rewrote the ingestion pipeline in Rust, cutting p99 latency by 40%"],
  "summary": "Strong backend match; infrastructure-as-code experience is not shown."
}

Rules:
- match_score is an integer from 0 to 100
- suggested_bullets rephrase achievements already present in the resume; never add new ones"#;
