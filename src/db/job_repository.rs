use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::job::dto::{JobFilter, NewJob};
use crate::db::models::JobRow;
use crate::db::sql::{PartialUpdate, SqlParam};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Repository for job table operations
///
/// Every operation is a single round-trip statement; "no matching row" is
/// detected strictly from an empty `RETURNING` result set, never a separate
/// existence check.
pub struct JobRepository;

impl JobRepository {
    /// Insert a job and return the full record including its generated id.
    ///
    /// Constraint failures (e.g. an unknown company handle) propagate
    /// unmodified.
    pub async fn create(pool: &Pool<Postgres>, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        debug!(
            "Creating job: title={}, company={}",
            job.title, job.company_handle
        );

        let row = sqlx::query_as::<_, JobRow>(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, salary, equity, company_handle",
        )
        .bind(&job.title)
        .bind(job.salary)
        .bind(job.equity)
        .bind(&job.company_handle)
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// Fetch all jobs matching the provided filters; with no filters, all
    /// jobs. Row order is whatever storage returns.
    pub async fn find(
        pool: &Pool<Postgres>,
        filter: &JobFilter,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        let (query, params) = build_filter_query(filter);
        debug!("Finding jobs: {}", query);

        let mut q = sqlx::query_as::<_, JobRow>(&query);
        for param in &params {
            q = bind_param(q, param);
        }
        q.fetch_all(pool).await
    }

    /// Fetch one job by id, or `None` when no row matches.
    pub async fn get(pool: &Pool<Postgres>, id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            "SELECT id, title, salary, equity, company_handle FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Apply a prebuilt partial update to one job.
    ///
    /// Only the columns in the SET clause change; everything else keeps its
    /// stored value. Returns the updated row, or `None` when no row matched.
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        update: &PartialUpdate,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        let query = build_update_query(update);
        debug!("Updating job id={}: {}", id, query);

        let mut q = sqlx::query_as::<_, JobRow>(&query);
        for param in &update.params {
            q = bind_param(q, param);
        }
        q.bind(id).fetch_optional(pool).await
    }

    /// Delete one job by id. Returns the deleted id, or `None` when no row
    /// matched.
    pub async fn remove(pool: &Pool<Postgres>, id: i32) -> Result<Option<i32>, sqlx::Error> {
        debug!("Removing job id={}", id);

        sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Assemble the job search SELECT from whichever filters are present.
///
/// Each present filter appends one AND-conjoined predicate; title and
/// minSalary also append one bind value each, with placeholder indexes
/// assigned in append order. hasEquity compares against a literal and takes
/// no parameter. With no filters the base query runs unmodified.
fn build_filter_query(filter: &JobFilter) -> (String, Vec<SqlParam>) {
    let mut query = format!("SELECT {} FROM jobs", JOB_COLUMNS);
    let mut predicates: Vec<String> = Vec::new();
    let mut params: Vec<SqlParam> = Vec::new();

    if let Some(title) = &filter.title {
        params.push(SqlParam::Text(format!("%{}%", title)));
        predicates.push(format!("title ILIKE ${}", params.len()));
    }
    if let Some(min_salary) = filter.min_salary {
        params.push(SqlParam::Int(min_salary));
        predicates.push(format!("salary >= ${}", params.len()));
    }
    // equity of exactly zero does not count as "has equity"
    if filter.has_equity == Some(true) {
        predicates.push("equity > 0".to_string());
    }

    if !predicates.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&predicates.join(" AND "));
    }

    (query, params)
}

/// Compose the UPDATE around a prebuilt SET clause; the id bind slot comes
/// right after the field params.
fn build_update_query(update: &PartialUpdate) -> String {
    format!(
        "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
        update.set_clause,
        update.params.len() + 1,
        JOB_COLUMNS,
    )
}

fn bind_param<'q>(
    query: QueryAs<'q, Postgres, JobRow, PgArguments>,
    param: &SqlParam,
) -> QueryAs<'q, Postgres, JobRow, PgArguments> {
    match param {
        SqlParam::Text(value) => query.bind(value.clone()),
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::Numeric(value) => query.bind(*value),
    }
}
