use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::{MySqlPool, types::Json};
use std::collections::BTreeMap;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{api::internal_error, calc::cash, model::cash::CashLedgerEntry};

const DEFAULT_PRESET_TARGET: f64 = 10_000.0;

#[derive(Deserialize, ToSchema)]
pub struct CreateCashEntry {
    #[schema(example = "Corte de caja viernes")]
    #[serde(default)]
    pub note: String,

    #[schema(value_type = Object, example = json!({"1000": 5, "500": 5, "100": 25}))]
    pub denomination_counts: BTreeMap<u32, f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PresetQuery {
    #[schema(example = 10000.0)]
    pub target: Option<f64>,
}

/// List Cash Ledger Entries
#[utoipa::path(
    get,
    path = "/api/cashLedger",
    responses(
        (status = 200, description = "Ledger entries", body = Vec<CashLedgerEntry>)
    ),
    tag = "CashLedger"
)]
pub async fn list_entries(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let entries = sqlx::query_as::<_, CashLedgerEntry>(
        "SELECT * FROM cash_ledger ORDER BY timestamp_iso DESC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch cash ledger");
        internal_error(e)
    })?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Create a ledger entry. The total is recomputed from the counts.
#[utoipa::path(
    post,
    path = "/api/cashLedger",
    request_body = CreateCashEntry,
    responses(
        (status = 201, description = "Entry stored", body = CashLedgerEntry),
        (status = 400, description = "Untracked denomination", body = Object, example = json!({
            "error": "Unknown denominations: [25]"
        }))
    ),
    tag = "CashLedger"
)]
pub async fn create_entry(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCashEntry>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let unknown = cash::unknown_denominations(&payload.denomination_counts);
    if !unknown.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!("Unknown denominations: {unknown:?}")
        })));
    }

    let total = cash::compute_total(&payload.denomination_counts);
    let id = Uuid::new_v4().to_string();
    let timestamp_iso = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO cash_ledger (id, timestamp_iso, note, denomination_counts, total)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&timestamp_iso)
    .bind(&payload.note)
    .bind(Json(&payload.denomination_counts))
    .bind(total)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to store cash ledger entry");
        internal_error(e)
    })?;

    Ok(HttpResponse::Created().json(CashLedgerEntry {
        id,
        timestamp_iso,
        note: payload.note,
        denomination_counts: Json(payload.denomination_counts),
        total,
    }))
}

/// Canonical count distribution for a target total.
#[utoipa::path(
    get,
    path = "/api/cashLedger/preset",
    params(
        ("target" = Option<f64>, Query, description = "Target total, defaults to 10000")
    ),
    responses(
        (status = 200, description = "Preset counts", body = Object, example = json!({
            "target": 10000.0,
            "denomination_counts": {"1000": 5, "500": 5, "100": 25},
            "total": 10000.0
        }))
    ),
    tag = "CashLedger"
)]
pub async fn preset(query: web::Query<PresetQuery>) -> actix_web::Result<impl Responder> {
    let target = query.target.unwrap_or(DEFAULT_PRESET_TARGET);
    let counts = cash::preset_counts(target);
    let total = cash::compute_total(&counts);

    Ok(HttpResponse::Ok().json(json!({
        "target": target,
        "denomination_counts": counts,
        "total": total
    })))
}

/// Delete a ledger entry.
#[utoipa::path(
    delete,
    path = "/api/cashLedger/{entry_id}",
    params(
        ("entry_id", Path, description = "Entry ID (UUID)")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Entry not found", body = Object, example = json!({
            "error": "Entry not found"
        }))
    ),
    tag = "CashLedger"
)]
pub async fn delete_entry(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let entry_id = path.into_inner();

    let result = sqlx::query("DELETE FROM cash_ledger WHERE id = ?")
        .bind(&entry_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, entry_id = %entry_id, "Failed to delete cash ledger entry");
            internal_error(e)
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Entry not found"
        })));
    }

    Ok(HttpResponse::NoContent().finish())
}
