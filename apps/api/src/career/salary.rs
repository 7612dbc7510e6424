//! Salary and market insights for a role / location / experience profile.

use serde::{Deserialize, Serialize};

use crate::career::prompts::{SALARY_PROMPT_TEMPLATE, SALARY_SYSTEM};
use crate::errors::AppError;
use crate::oracle::prompts::{fill_template, NO_FABRICATION_INSTRUCTION};
use crate::oracle::{OracleClient, OracleError, Template};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryQuery {
    pub role: String,
    pub location: String,
    pub years_experience: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryInsights {
    pub currency: String,
    pub low: f64,
    pub median: f64,
    pub high: f64,
    #[serde(default)]
    pub market_notes: Vec<String>,
    #[serde(default)]
    pub negotiation_tips: Vec<String>,
}

pub struct EstimateSalary;

impl Template for EstimateSalary {
    const NAME: &'static str = "salary_insights";
    const SYSTEM: &'static str = SALARY_SYSTEM;
    type Input = SalaryQuery;
    type Output = SalaryInsights;

    fn render(input: &SalaryQuery) -> Result<String, OracleError> {
        let years = input.years_experience.to_string();
        Ok(fill_template(
            SALARY_PROMPT_TEMPLATE,
            &[
                ("no_fabrication", NO_FABRICATION_INSTRUCTION),
                ("role", input.role.trim()),
                ("location", input.location.trim()),
                ("years_experience", &years),
            ],
        ))
    }
}

pub async fn estimate_salary(
    query: &SalaryQuery,
    oracle: &OracleClient,
) -> Result<SalaryInsights, AppError> {
    if query.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    if query.location.trim().is_empty() {
        return Err(AppError::Validation("location cannot be empty".to_string()));
    }

    let insights = oracle
        .invoke::<EstimateSalary>(query)
        .await
        .map_err(|e| AppError::Oracle(format!("Salary estimation failed: {e}")))?;
    validate_range(&insights)?;
    Ok(insights)
}

fn validate_range(insights: &SalaryInsights) -> Result<(), AppError> {
    let SalaryInsights {
        low, median, high, ..
    } = *insights;
    let ordered = low >= 0.0 && low <= median && median <= high;
    if !ordered || !high.is_finite() {
        return Err(AppError::Oracle(format!(
            "Salary range is inconsistent: low={low}, median={median}, high={high}"
        )));
    }
    if insights.currency.trim().len() != 3 {
        return Err(AppError::Oracle(format!(
            "Salary currency '{}' is not an ISO 4217 code",
            insights.currency
        )));
    }
    Ok(())
}
