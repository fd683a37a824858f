use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Juan Pérez",
        "position": "Soldador",
        "area": "Taller",
        "status": "Activo",
        "hourly_rate": 50.0,
        "overtime_multiplier": 1.8,
        "pay_type": "Por horas",
        "weekly_pay": 0.0
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Juan Pérez")]
    pub name: String,

    #[schema(example = "Soldador")]
    pub position: String,

    #[schema(example = "Taller")]
    pub area: String,

    /// "Activo" or "Baja"
    #[schema(example = "Activo")]
    pub status: String,

    #[schema(example = 50.0)]
    pub hourly_rate: f64,

    #[schema(example = 1.8)]
    pub overtime_multiplier: f64,

    /// "Por horas" or "Semanal fijo"
    #[schema(example = "Por horas")]
    pub pay_type: String,

    #[schema(example = 0.0)]
    pub weekly_pay: f64,
}
