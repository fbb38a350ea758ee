use actix_web::{HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use std::fmt;
use tracing::{error, info, warn};

use super::dto::{JobFilter, JobUpdate, NewJob};
use crate::api::validation::ErrorResponse;
use crate::db::job_repository::JobRepository;
use crate::db::models::JobRow;
use crate::db::sql::{SqlParam, sql_for_partial_update};

/// Service-level errors
///
/// The closed set of failure kinds this system produces. `error_response` is
/// the single place they turn into HTTP statuses; no other layer maps or
/// swallows errors.
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    Database(sqlx::Error),

    /// Payload deserialized but is unusable (e.g. an empty partial update)
    InvalidInput(String),

    /// No job matched the requested id
    NotFound(i32),

    /// Caller is not an admin, or presented no usable credentials
    Unauthorized(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(e) => write!(f, "Database error: {}", e),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Database(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::InvalidInput(msg) => {
                warn!("Invalid input: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Invalid input".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("No job with id {}", id)}),
                })
            }
            ServiceError::Unauthorized(msg) => {
                warn!("Unauthorized: {}", msg);
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "Unauthorized".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
        }
    }
}

/// Job service containing business logic
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    /// Create a new JobService owning its database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a single job posting
    pub async fn create_job(&self, job: &NewJob) -> Result<JobRow, ServiceError> {
        info!(
            "Service: creating job title={} company={}",
            job.title, job.company_handle
        );

        let row = JobRepository::create(&self.pool, job)
            .await
            .map_err(ServiceError::Database)?;

        info!("Service: job created with id={}", row.id);
        Ok(row)
    }

    /// List jobs matching the provided filters; all jobs when none are set
    pub async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, ServiceError> {
        JobRepository::find(&self.pool, filter)
            .await
            .map_err(ServiceError::Database)
    }

    /// Fetch one job by id
    pub async fn get_job(&self, id: i32) -> Result<JobRow, ServiceError> {
        JobRepository::get(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Apply a partial update to one job
    ///
    /// Only the provided fields change; everything else keeps its stored
    /// value. A payload with no fields at all is invalid input.
    pub async fn update_job(&self, id: i32, changes: &JobUpdate) -> Result<JobRow, ServiceError> {
        let mut fields: Vec<(&str, SqlParam)> = Vec::new();
        if let Some(title) = &changes.title {
            fields.push(("title", SqlParam::Text(title.clone())));
        }
        if let Some(salary) = changes.salary {
            fields.push(("salary", SqlParam::Int(salary)));
        }
        if let Some(equity) = changes.equity {
            fields.push(("equity", SqlParam::Numeric(equity)));
        }

        // job fields map to their columns unchanged, so no overrides
        let update = sql_for_partial_update(&fields, &[])
            .map_err(|_| ServiceError::InvalidInput("no data to update".to_string()))?;

        info!(
            "Service: updating job id={} ({} fields)",
            id,
            update.params.len()
        );

        JobRepository::update(&self.pool, id, &update)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Delete one job by id
    pub async fn remove_job(&self, id: i32) -> Result<(), ServiceError> {
        info!("Service: removing job id={}", id);

        JobRepository::remove(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound(id))?;

        Ok(())
    }
}
