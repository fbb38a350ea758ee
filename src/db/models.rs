use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a job posting with all fields
///
/// `equity` is NUMERIC in storage and serializes as a decimal string, so
/// values like "0.05" survive the round trip exactly.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}
