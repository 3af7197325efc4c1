use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::json;

use crate::utils::error::CustomError;

pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string())
}

/// Wrap a procedure output in the standard success envelope.
pub fn envelope<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": true,
        "message": message,
        "httpStatusCode": status.as_u16(),
        "service": service_name(),
        "data": data,
    }))
}

/// Trim `value` and reject it when nothing is left.
pub fn require_non_empty(value: &str, field: &str) -> Result<String, CustomError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CustomError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field; blank input counts as absent.
pub fn optional_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
