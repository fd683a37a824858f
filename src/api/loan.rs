use crate::{api::internal_error, model::loan::Loan};
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLoan {
    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = 1500.0)]
    pub amount: f64,

    #[schema(example = "Adelanto de herramienta")]
    pub description: Option<String>,
}

/// List Loans
#[utoipa::path(
    get,
    path = "/api/loans",
    responses(
        (status = 200, description = "Loan list", body = Vec<Loan>)
    ),
    tag = "Loans"
)]
pub async fn list_loans(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY created_at DESC")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch loans");
            internal_error(e)
        })?;

    Ok(HttpResponse::Ok().json(loans))
}

/// Create Loan
#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Unknown employee", body = Object, example = json!({
            "error": "Unknown employee_id"
        }))
    ),
    tag = "Loans"
)]
pub async fn create_loan(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLoan>,
) -> actix_web::Result<impl Responder> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE id = ?")
        .bind(payload.employee_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = payload.employee_id, "Failed to check employee");
            internal_error(e)
        })?;

    if exists == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Unknown employee_id"
        })));
    }

    let description = payload.description.clone().unwrap_or_default();
    let created_at = Utc::now().naive_utc();

    let result = sqlx::query(
        r#"
        INSERT INTO loans (employee_id, amount, description, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.amount)
    .bind(&description)
    .bind(created_at)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create loan");
        internal_error(e)
    })?;

    let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created loan");
            internal_error(e)
        })?;

    Ok(HttpResponse::Created().json(loan))
}

/// Delete Loan
#[utoipa::path(
    delete,
    path = "/api/loans/{loan_id}",
    params(
        ("loan_id", Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Loan not found", body = Object, example = json!({
            "error": "Loan not found"
        }))
    ),
    tag = "Loans"
)]
pub async fn delete_loan(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let loan_id = path.into_inner();

    let result = sqlx::query("DELETE FROM loans WHERE id = ?")
        .bind(loan_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, loan_id, "Failed to delete loan");
            internal_error(e)
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Loan not found"
        })));
    }

    Ok(HttpResponse::NoContent().finish())
}
