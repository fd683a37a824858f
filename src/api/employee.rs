use crate::{
    api::internal_error,
    model::employee::Employee,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Columns a partial update may touch.
const UPDATABLE_COLS: &[&str] = &[
    "name",
    "position",
    "area",
    "status",
    "hourly_rate",
    "overtime_multiplier",
    "pay_type",
    "weekly_pay",
];

fn default_status() -> String {
    "Activo".to_string()
}

fn default_pay_type() -> String {
    "Por horas".to_string()
}

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Juan Pérez")]
    pub name: String,

    #[schema(example = "Soldador")]
    #[serde(default)]
    pub position: String,

    #[schema(example = "Taller")]
    #[serde(default)]
    pub area: String,

    #[schema(example = "Activo")]
    #[serde(default = "default_status")]
    pub status: String,

    #[schema(example = 50.0)]
    #[serde(default)]
    pub hourly_rate: f64,

    #[schema(example = 1.8)]
    #[serde(default)]
    pub overtime_multiplier: f64,

    #[schema(example = "Por horas")]
    #[serde(default = "default_pay_type")]
    pub pay_type: String,

    #[schema(example = 0.0)]
    #[serde(default)]
    pub weekly_pay: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    /// Filter by status ("Activo" / "Baja")
    pub status: Option<String>,
    /// Substring match on name, position or area
    pub search: Option<String>,
}

async fn fetch_employee(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Empty name", body = Object, example = json!({
            "error": "name must not be empty"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "name must not be empty"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (name, position, area, status, hourly_rate, overtime_multiplier, pay_type, weekly_pay)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.position)
    .bind(&payload.area)
    .bind(&payload.status)
    .bind(payload.hourly_rate)
    .bind(payload.overtime_multiplier)
    .bind(&payload.pay_type)
    .bind(payload.weekly_pay)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create employee");
        internal_error(e)
    })?;

    let created = fetch_employee(pool.get_ref(), result.last_insert_id())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created employee");
            internal_error(e)
        })?;

    match created {
        Some(emp) => Ok(HttpResponse::Created().json(emp)),
        None => Ok(HttpResponse::InternalServerError().json(json!({
            "error": "Employee vanished after insert"
        }))),
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Search by name, position or area")
    ),
    responses(
        (status = 200, description = "Employee list", body = Vec<Employee>)
    ),
    tag = "Employees"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR position LIKE ? OR area LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("SELECT * FROM employees {} ORDER BY name", where_clause);
    debug!(sql = %sql, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %sql, "Failed to fetch employees");
        internal_error(e)
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            internal_error(e)
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        }))),
    }
}

/// Partially update an employee. Unknown fields are rejected.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Updated employee", body = Employee),
        (status = 400, description = "Bad payload"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let update = build_update_sql("employees", UPDATABLE_COLS, &body, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to update employee");
        internal_error(e)
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        })));
    }

    let updated = fetch_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch updated employee");
            internal_error(e)
        })?;

    match updated {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        }))),
    }
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to delete employee");
            internal_error(e)
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        })));
    }

    Ok(HttpResponse::NoContent().finish())
}
