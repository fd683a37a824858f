use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored daily check-in. `hours_worked` is derived from the two time
/// strings on insert, never taken from the client.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CheckinEntry {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Juan Pérez")]
    pub employee_name: String,

    /// Free-text day label ("Lunes", "2026-08-24", ...)
    #[schema(example = "Lunes")]
    pub day: String,

    #[schema(example = "08:00")]
    pub time_in: String,

    #[schema(example = "17:30")]
    pub time_out: String,

    #[schema(example = 9.5)]
    pub hours_worked: f64,

    #[schema(example = "Semana 34")]
    pub week_label: String,
}
