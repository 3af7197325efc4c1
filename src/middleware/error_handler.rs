use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web;

use crate::utils::error::CustomError;

/// Malformed mutation bodies become structured validation errors before the
/// handler runs.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected body for {}: {}", req.path(), err);
    CustomError::ValidationError(format!("Invalid input: {}", err)).into()
}

/// Same as [`json_error_handler`] for query-string inputs.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected query for {}: {}", req.path(), err);
    CustomError::ValidationError(format!("Invalid input: {}", err)).into()
}

/// Extractor configuration shared by every procedure.
pub fn input_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}
