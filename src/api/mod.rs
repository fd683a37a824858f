use actix_web::HttpResponse;

pub mod cash;
pub mod checkin;
pub mod employee;
pub mod loan;
pub mod payroll;

/// Map any internal failure to a 500 whose body follows the `{"error": ...}`
/// contract. The cause is expected to have been logged at the call site.
pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> actix_web::Error {
    actix_web::error::InternalError::from_response(
        e.to_string(),
        HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "Internal Server Error" })),
    )
    .into()
}
