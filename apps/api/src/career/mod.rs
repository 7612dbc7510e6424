// Career tools: job posting parsing, interview plans, salary insights, resume tailoring.
// All model calls go through oracle::OracleClient with a typed Template per call site.

pub mod handlers;
pub mod interview;
pub mod job_details;
pub mod prompts;
pub mod resume;
pub mod salary;
