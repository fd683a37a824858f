use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    api::internal_error,
    calc::{aggregate::WeekEmployeeSummary, aggregate::summarize_week, timespan},
    model::checkin::CheckinEntry,
};

/// One check-in as submitted by the client. Worked hours are not accepted
/// from the wire; they are derived from the two time strings on insert.
#[derive(Deserialize, ToSchema)]
pub struct CheckinDraft {
    #[schema(example = "Juan Pérez")]
    pub employee_name: String,

    #[schema(example = "Lunes")]
    pub day: String,

    #[schema(example = "08:00")]
    pub time_in: String,

    #[schema(example = "17:30")]
    pub time_out: String,

    #[schema(example = "Semana 34")]
    pub week_label: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateCheckins {
    pub entries: Vec<CheckinDraft>,
}

#[derive(Deserialize, ToSchema)]
pub struct CloseWeekRequest {
    #[schema(example = "Semana 34")]
    pub week_label: String,
}

#[derive(Serialize, ToSchema)]
pub struct CloseWeekSummary {
    #[schema(example = "Week Semana 34 closed")]
    pub message: String,
    pub week_label: String,
    pub total_records: usize,
    pub total_employees: usize,
    pub employees: Vec<WeekEmployeeSummary>,
}

/// List Check-ins
#[utoipa::path(
    get,
    path = "/api/checkins",
    responses(
        (status = 200, description = "Stored check-ins", body = Vec<CheckinEntry>)
    ),
    tag = "Checkins"
)]
pub async fn list_checkins(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let entries = sqlx::query_as::<_, CheckinEntry>("SELECT * FROM checkins ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch check-ins");
            internal_error(e)
        })?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Store a set of check-ins in one transaction.
#[utoipa::path(
    post,
    path = "/api/checkins",
    request_body = CreateCheckins,
    responses(
        (status = 200, description = "Check-ins stored", body = Object, example = json!({
            "message": "Check-ins stored",
            "inserted": 5
        })),
        (status = 400, description = "Empty batch", body = Object, example = json!({
            "error": "entries must not be empty"
        }))
    ),
    tag = "Checkins"
)]
pub async fn create_checkins(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCheckins>,
) -> actix_web::Result<impl Responder> {
    if payload.entries.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "entries must not be empty"
        })));
    }

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        internal_error(e)
    })?;

    for entry in &payload.entries {
        let hours_worked = timespan::span_hours(&entry.time_in, &entry.time_out);

        sqlx::query(
            r#"
            INSERT INTO checkins
            (employee_name, day, time_in, time_out, hours_worked, week_label)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.employee_name)
        .bind(&entry.day)
        .bind(&entry.time_in)
        .bind(&entry.time_out)
        .bind(hours_worked)
        .bind(&entry.week_label)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, employee = %entry.employee_name, "Failed to store check-in");
            internal_error(e)
        })?;
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit check-ins");
        internal_error(e)
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Check-ins stored",
        "inserted": payload.entries.len()
    })))
}

/// Close a week: group its check-ins by employee and report hour totals,
/// alphabetically by name.
///
/// A week with no records is still a valid close and yields an empty
/// summary; 404 stays reserved for a missing route.
#[utoipa::path(
    post,
    path = "/api/checkins/closeWeek",
    request_body = CloseWeekRequest,
    responses(
        (status = 200, description = "Week summary", body = CloseWeekSummary)
    ),
    tag = "Checkins"
)]
pub async fn close_week(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CloseWeekRequest>,
) -> actix_web::Result<impl Responder> {
    let week_label = payload.week_label.clone();

    let entries =
        sqlx::query_as::<_, CheckinEntry>("SELECT * FROM checkins WHERE week_label = ?")
            .bind(&week_label)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, week_label = %week_label, "Failed to fetch week check-ins");
                internal_error(e)
            })?;

    let employees = summarize_week(
        entries
            .iter()
            .map(|e| (e.employee_name.as_str(), e.hours_worked)),
    );

    Ok(HttpResponse::Ok().json(CloseWeekSummary {
        message: format!("Week {week_label} closed"),
        week_label,
        total_records: entries.len(),
        total_employees: employees.len(),
        employees,
    }))
}
