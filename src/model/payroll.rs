use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

use crate::calc::payroll::PayrollEmployeeRecord;

/// A persisted payroll batch. The derived employee records are stored as one
/// JSON document; the batch is read-only once written.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollBatchRow {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Semana 34")]
    pub week_label: String,

    #[schema(value_type = Vec<PayrollEmployeeRecord>)]
    pub employees: Json<Vec<PayrollEmployeeRecord>>,

    #[schema(example = 18650.0)]
    pub grand_total: f64,

    #[schema(example = "2026-08-24T09:00:00", value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
