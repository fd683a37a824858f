use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Loan {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = 1500.0)]
    pub amount: f64,

    #[schema(example = "Adelanto de herramienta")]
    pub description: String,

    #[schema(example = "2026-08-24T09:00:00", value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
