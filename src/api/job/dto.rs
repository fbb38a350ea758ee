use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::db::models::JobRow;

/// Payload for creating a job. Unrecognized keys are rejected outright.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary: Option<i32>,
    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,
    #[validate(length(
        min = 1,
        max = 25,
        message = "Company handle must be between 1 and 25 characters"
    ))]
    pub company_handle: String,
}

/// Partial-update payload: any subset of the mutable job fields. The id and
/// company handle are immutable and not accepted here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: Option<String>,
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary: Option<i32>,
    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,
}

/// Search filters for job listings. Unrecognized keys are rejected.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    #[validate(range(min = 0, message = "minSalary cannot be negative"))]
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

fn validate_equity(equity: &Decimal) -> Result<(), ValidationError> {
    if *equity < Decimal::ZERO || *equity > Decimal::ONE {
        let mut error = ValidationError::new("range");
        error.message = Some("Equity must be between 0 and 1".into());
        return Err(error);
    }
    Ok(())
}

/// Response wrapping a single job
#[derive(Serialize)]
pub struct JobResponse {
    pub job: JobRow,
}

/// Response for job listings
#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
}

/// Response for a deletion, echoing the removed id
#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_job_rejects_unknown_keys() {
        let result = serde_json::from_value::<NewJob>(json!({
            "title": "Engineer",
            "companyHandle": "c1",
            "location": "remote"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn new_job_accepts_equity_as_string_or_number() {
        let from_string = serde_json::from_value::<NewJob>(json!({
            "title": "Engineer",
            "companyHandle": "c1",
            "equity": "0.1"
        }))
        .unwrap();
        let from_number = serde_json::from_value::<NewJob>(json!({
            "title": "Engineer",
            "companyHandle": "c1",
            "equity": 0.1
        }))
        .unwrap();

        let expected: Decimal = "0.1".parse().unwrap();
        assert_eq!(from_string.equity, Some(expected));
        assert_eq!(from_number.equity, Some(expected));
    }

    #[test]
    fn equity_above_one_fails_validation() {
        let job = serde_json::from_value::<NewJob>(json!({
            "title": "Engineer",
            "companyHandle": "c1",
            "equity": "1.5"
        }))
        .unwrap();

        let errors = job.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("equity"));
    }

    #[test]
    fn negative_salary_fails_validation() {
        let job = serde_json::from_value::<NewJob>(json!({
            "title": "Engineer",
            "companyHandle": "c1",
            "salary": -1
        }))
        .unwrap();

        let errors = job.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("salary"));
    }

    #[test]
    fn validation_reports_every_violated_constraint() {
        let job = serde_json::from_value::<NewJob>(json!({
            "title": "",
            "companyHandle": "",
            "salary": -5,
            "equity": "2"
        }))
        .unwrap();

        let errors = job.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("company_handle"));
        assert!(fields.contains_key("salary"));
        assert!(fields.contains_key("equity"));
    }

    #[test]
    fn update_with_no_fields_deserializes_to_all_none() {
        let update = serde_json::from_value::<JobUpdate>(json!({})).unwrap();
        assert!(update.title.is_none());
        assert!(update.salary.is_none());
        assert!(update.equity.is_none());
    }

    #[test]
    fn filter_rejects_unknown_keys() {
        let result = serde_json::from_value::<JobFilter>(json!({ "location": "remote" }));
        assert!(result.is_err());
    }

    #[test]
    fn filter_uses_camel_case_keys() {
        let filter = serde_json::from_value::<JobFilter>(json!({
            "minSalary": 10000,
            "hasEquity": true
        }))
        .unwrap();
        assert_eq!(filter.min_salary, Some(10000));
        assert_eq!(filter.has_equity, Some(true));
    }
}
