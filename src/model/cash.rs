use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// One cash-denomination count ledger entry.
///
/// `total` always equals the weighted sum of `denomination_counts`; it is
/// recomputed on insert, never trusted from the client.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CashLedgerEntry {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,

    #[schema(example = "2026-08-24T09:00:00+00:00")]
    pub timestamp_iso: String,

    #[schema(example = "Corte de caja viernes")]
    pub note: String,

    #[schema(value_type = Object, example = json!({"1000": 5, "500": 5, "100": 25}))]
    pub denomination_counts: Json<BTreeMap<u32, f64>>,

    #[schema(example = 10000.0)]
    pub total: f64,
}
