use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sqlx::{MySqlPool, types::Json};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::{
    api::internal_error,
    calc::{
        aggregate::{self, NameTotal, Row},
        autocalc::{self, AutoCalcSettings},
        payroll::{self, PayrollBatch, PayrollDraftRow, PayrollEmployeeRecord},
    },
    config::Config,
    model::payroll::PayrollBatchRow,
    utils::csv,
};

/// Tolerance when checking a client-submitted grand total.
const GRAND_TOTAL_TOLERANCE: f64 = 1e-6;

const DEFAULT_NAME_FIELD: &str = "name";
const DEFAULT_AMOUNT_FIELD: &str = "final_total";
const DEFAULT_TOP_N: usize = 5;

#[derive(Deserialize, ToSchema)]
pub struct CreateBatch {
    #[schema(example = "Semana 34")]
    pub week_label: String,
    pub employees: Vec<PayrollEmployeeRecord>,
    #[schema(example = 18650.0)]
    pub grand_total: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct PreviewRequest {
    #[schema(example = "Semana 34")]
    pub week_label: String,
    /// Auto-calculation toggles; server defaults apply when omitted.
    pub settings: Option<AutoCalcSettings>,
    pub drafts: Vec<PayrollDraftRow>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetricsQuery {
    /// Grouping column, defaults to "name"
    pub name_field: Option<String>,
    /// Amount column, defaults to "final_total"
    pub amount_field: Option<String>,
    /// Restrict to one period value (exact match on the period-like column)
    pub period: Option<String>,
    /// Ranking size, defaults to 5
    pub top: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct Metrics {
    pub total_records: usize,
    pub distinct_employees: usize,
    pub amount_sum: f64,
    pub top_totals: Vec<NameTotal>,
    /// Distinct values of the detected period column
    pub periods: Vec<String>,
    /// Numeric columns detected over the flattened rows, first-row key order
    pub numeric_columns: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportQuery {
    pub period: Option<String>,
}

/// Flatten a stored batch into loosely-typed rows, one per employee record,
/// with the batch's week label injected as the leading column.
fn flatten_batch(batch: &PayrollBatchRow) -> Vec<Row> {
    batch
        .employees
        .iter()
        .filter_map(|record| {
            let Ok(Value::Object(fields)) = serde_json::to_value(record) else {
                return None;
            };
            let mut row = Map::new();
            row.insert("week_label".to_string(), json!(batch.week_label));
            row.extend(fields);
            Some(row)
        })
        .collect()
}

fn apply_period_filter(rows: Vec<Row>, period: Option<&str>) -> Vec<Row> {
    let Some(period) = period else {
        return rows;
    };
    let columns: Vec<String> = rows
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default();
    match aggregate::detect_period_column(&columns) {
        Some(col) => aggregate::filter_period(rows, &col, period),
        None => rows,
    }
}

/// List payroll batches, newest first.
#[utoipa::path(
    get,
    path = "/api/payrollBatches",
    responses(
        (status = 200, description = "Stored batches", body = Vec<PayrollBatchRow>)
    ),
    tag = "Payroll"
)]
pub async fn list_batches(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let batches = sqlx::query_as::<_, PayrollBatchRow>(
        "SELECT * FROM payroll_batches ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch payroll batches");
        internal_error(e)
    })?;

    Ok(HttpResponse::Ok().json(batches))
}

/// Store a submitted batch.
///
/// Blank-name records are dropped and the grand total is re-derived; a
/// client total that disagrees beyond tolerance is rejected rather than
/// silently corrected.
#[utoipa::path(
    post,
    path = "/api/payrollBatches",
    request_body = CreateBatch,
    responses(
        (status = 201, description = "Batch stored", body = PayrollBatchRow),
        (status = 400, description = "Grand total mismatch", body = Object, example = json!({
            "error": "grand_total mismatch: derived 18650.00"
        }))
    ),
    tag = "Payroll"
)]
pub async fn create_batch(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateBatch>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let employees: Vec<PayrollEmployeeRecord> = payload
        .employees
        .into_iter()
        .filter(|e| !e.name.trim().is_empty())
        .collect();

    let derived_total = payroll::grand_total(&employees);
    if (derived_total - payload.grand_total).abs() > GRAND_TOTAL_TOLERANCE {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!("grand_total mismatch: derived {derived_total:.2}")
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO payroll_batches (week_label, employees, grand_total, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&payload.week_label)
    .bind(Json(&employees))
    .bind(derived_total)
    .bind(Utc::now().naive_utc())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, week_label = %payload.week_label, "Failed to store payroll batch");
        internal_error(e)
    })?;

    let stored = sqlx::query_as::<_, PayrollBatchRow>("SELECT * FROM payroll_batches WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch stored batch");
            internal_error(e)
        })?;

    Ok(HttpResponse::Created().json(stored))
}

/// Derive a batch from draft rows without persisting it.
///
/// Runs the auto-calculation policies (threshold split, overtime-rate
/// multiplier) and the full payroll derivation server-side.
#[utoipa::path(
    post,
    path = "/api/payrollBatches/preview",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Derived batch", body = PayrollBatch)
    ),
    tag = "Payroll"
)]
pub async fn preview_batch(
    config: web::Data<Config>,
    payload: web::Json<PreviewRequest>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let settings = payload.settings.unwrap_or(AutoCalcSettings {
        threshold: config.overtime_threshold,
        multiplier: config.overtime_multiplier,
        ..Default::default()
    });

    let normalized: Vec<PayrollDraftRow> = payload
        .drafts
        .iter()
        .map(|d| autocalc::normalize_row(&settings, d))
        .collect();

    let batch = payroll::build_batch(&payload.week_label, &normalized);
    Ok(HttpResponse::Ok().json(batch))
}

/// Aggregate metrics over the flattened employee rows of all batches.
#[utoipa::path(
    get,
    path = "/api/payrollBatches/metrics",
    params(
        ("name_field" = Option<String>, Query, description = "Grouping column"),
        ("amount_field" = Option<String>, Query, description = "Amount column"),
        ("period" = Option<String>, Query, description = "Period filter"),
        ("top" = Option<usize>, Query, description = "Ranking size")
    ),
    responses(
        (status = 200, description = "Aggregated metrics", body = Metrics)
    ),
    tag = "Payroll"
)]
pub async fn batch_metrics(
    pool: web::Data<MySqlPool>,
    query: web::Query<MetricsQuery>,
) -> actix_web::Result<impl Responder> {
    let batches = sqlx::query_as::<_, PayrollBatchRow>(
        "SELECT * FROM payroll_batches ORDER BY created_at",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch payroll batches");
        internal_error(e)
    })?;

    let rows: Vec<Row> = batches.iter().flat_map(flatten_batch).collect();

    let columns: Vec<String> = rows
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default();
    let periods = match aggregate::detect_period_column(&columns) {
        Some(col) => aggregate::period_values(&rows, &col),
        None => Vec::new(),
    };

    let numeric_columns = aggregate::numeric_columns(&rows);

    let rows = apply_period_filter(rows, query.period.as_deref());

    let name_field = query.name_field.as_deref().unwrap_or(DEFAULT_NAME_FIELD);
    // Fall back to the first detected numeric column when the usual amount
    // column is absent from the data.
    let amount_field = query.amount_field.as_deref().unwrap_or_else(|| {
        if numeric_columns.iter().any(|c| c == DEFAULT_AMOUNT_FIELD) {
            DEFAULT_AMOUNT_FIELD
        } else {
            numeric_columns
                .first()
                .map(String::as_str)
                .unwrap_or(DEFAULT_AMOUNT_FIELD)
        }
    });
    let top = query.top.unwrap_or(DEFAULT_TOP_N);
    debug!(name_field, amount_field, rows = rows.len(), "Computing payroll metrics");

    let total_records = rows.len();
    let distinct_employees = aggregate::distinct_count(&rows, name_field);
    let amount_sum = aggregate::sum_field(&rows, amount_field);
    let top_totals = aggregate::top_n(&rows, name_field, amount_field, top);

    Ok(HttpResponse::Ok().json(Metrics {
        total_records,
        distinct_employees,
        amount_sum,
        top_totals,
        periods,
        numeric_columns,
    }))
}

/// Export flattened batch rows as CSV.
#[utoipa::path(
    get,
    path = "/api/payrollBatches/export",
    params(
        ("period" = Option<String>, Query, description = "Period filter")
    ),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv")
    ),
    tag = "Payroll"
)]
pub async fn export_batches(
    pool: web::Data<MySqlPool>,
    query: web::Query<ExportQuery>,
) -> actix_web::Result<impl Responder> {
    let mut stream = sqlx::query_as::<_, PayrollBatchRow>(
        "SELECT * FROM payroll_batches ORDER BY created_at",
    )
    .fetch(pool.get_ref());

    let mut rows: Vec<Row> = Vec::new();
    while let Some(batch) = stream.next().await {
        let batch = batch.map_err(|e| {
            error!(error = %e, "Failed to stream payroll batches");
            internal_error(e)
        })?;
        rows.extend(flatten_batch(&batch));
    }

    let rows = apply_period_filter(rows, query.period.as_deref());
    let body = csv::to_csv(&rows);

    let filename = match &query.period {
        Some(p) => format!("nominas_{p}.csv"),
        None => "nominas_todos.csv".to_string(),
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::payroll::derive;

    fn sample_batch() -> PayrollBatchRow {
        let drafts = [
            PayrollDraftRow {
                name: "Ana".into(),
                primary_hours: 40.0,
                primary_rate: 50.0,
                ..Default::default()
            },
            PayrollDraftRow {
                name: "Luis".into(),
                primary_hours: 30.0,
                primary_rate: 60.0,
                ..Default::default()
            },
        ];
        let employees: Vec<PayrollEmployeeRecord> = drafts.iter().map(derive).collect();
        let grand_total = payroll::grand_total(&employees);
        PayrollBatchRow {
            id: 1,
            week_label: "Semana 1".into(),
            employees: Json(employees),
            grand_total,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn flatten_injects_week_label_first() {
        let rows = flatten_batch(&sample_batch());
        assert_eq!(rows.len(), 2);
        let first_key = rows[0].keys().next().unwrap();
        assert_eq!(first_key, "week_label");
        assert_eq!(rows[0]["name"], json!("Ana"));
        assert_eq!(rows[0]["final_total"], json!(2000.0));
    }

    #[test]
    fn period_filter_restricts_rows() {
        let mut rows = flatten_batch(&sample_batch());
        let mut other = sample_batch();
        other.week_label = "Semana 2".into();
        rows.extend(flatten_batch(&other));

        let kept = apply_period_filter(rows, Some("Semana 2"));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r["week_label"] == json!("Semana 2")));
    }

    #[test]
    fn flattened_rows_feed_aggregation() {
        let rows = flatten_batch(&sample_batch());
        assert_eq!(aggregate::distinct_count(&rows, "name"), 2);
        let sum = aggregate::sum_field(&rows, "final_total");
        assert!((sum - 3800.0).abs() < 1e-9);
    }

    #[test]
    fn flattened_rows_expose_numeric_columns() {
        let rows = flatten_batch(&sample_batch());
        let numeric = aggregate::numeric_columns(&rows);
        assert!(numeric.iter().any(|c| c == "final_total"));
        assert!(numeric.iter().any(|c| c == "primary_hours"));
        assert!(!numeric.iter().any(|c| c == "name"));
        assert!(!numeric.iter().any(|c| c == "week_label"));
    }
}
