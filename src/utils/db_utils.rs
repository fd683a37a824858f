use actix_web::error::ErrorBadRequest;
use serde_json::Value;
use sqlx::MySqlPool;

/// A value bindable into a dynamic UPDATE.
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Null,
}

/// Dynamic partial UPDATE built from a JSON payload.
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build `UPDATE <table> SET k = ?, ... WHERE <id_column> = ?` from a JSON
/// object. Only keys present in `allowed` are accepted; anything else is a
/// 400, which also keeps payload keys out of the SQL text unvetted.
pub fn build_update_sql(
    table: &str,
    allowed: &[&str],
    payload: &Value,
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let mut columns = Vec::with_capacity(obj.len());
    let mut values = Vec::with_capacity(obj.len() + 1);

    for (key, value) in obj {
        if !allowed.contains(&key.as_str()) {
            return Err(ErrorBadRequest(format!("Unknown field: {key}")));
        }
        columns.push(format!("{key} = ?"));
        values.push(match value {
            Value::String(s) => SqlValue::String(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::I64(i)
                } else {
                    SqlValue::F64(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Null => SqlValue::Null,
            _ => return Err(ErrorBadRequest(format!("Unsupported value for {key}"))),
        });
    }

    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            table,
            columns.join(", "),
            id_column
        ),
        values,
    })
}

/// Execute a built update, returning affected row count.
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);
    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EMPLOYEE_COLS: &[&str] = &["name", "area", "hourly_rate"];

    #[test]
    fn builds_set_clause_for_allowed_fields() {
        let payload = json!({"area": "Taller", "hourly_rate": 55.5});
        let update = build_update_sql("employees", EMPLOYEE_COLS, &payload, "id", 7).unwrap();
        assert_eq!(
            update.sql,
            "UPDATE employees SET area = ?, hourly_rate = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
    }

    #[test]
    fn rejects_unknown_field() {
        let payload = json!({"area": "Taller", "id": 99});
        assert!(build_update_sql("employees", EMPLOYEE_COLS, &payload, "id", 7).is_err());
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(build_update_sql("employees", EMPLOYEE_COLS, &json!({}), "id", 7).is_err());
        assert!(build_update_sql("employees", EMPLOYEE_COLS, &json!([1, 2]), "id", 7).is_err());
    }
}
