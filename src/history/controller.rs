use crate::history::model::{HistoryQuery, PreferredCategoriesQuery, TrackReadRequest};
use crate::history::service::HistoryService;
use crate::utils::error::CustomError;
use crate::utils::helpers::envelope;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

/// POST /rpc/readHistory.trackRead
pub async fn track_read(
    history_service: web::Data<HistoryService>,
    body: web::Json<TrackReadRequest>,
) -> Result<HttpResponse, CustomError> {
    let record = history_service.track_read(body.into_inner()).await?;
    Ok(envelope(StatusCode::OK, "Read tracked successfully", record))
}

/// GET /rpc/readHistory.getHistory?userId=...&limit=...
pub async fn get_history(
    history_service: web::Data<HistoryService>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, CustomError> {
    let history = history_service
        .get_history(&query.user_id, query.limit)
        .await?;
    Ok(envelope(
        StatusCode::OK,
        "Reading history retrieved successfully",
        history,
    ))
}

/// GET /rpc/readHistory.getPreferredCategories?userId=...
pub async fn get_preferred_categories(
    history_service: web::Data<HistoryService>,
    query: web::Query<PreferredCategoriesQuery>,
) -> Result<HttpResponse, CustomError> {
    let categories = history_service.preferred_categories(&query.user_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "Preferred categories retrieved successfully",
        categories,
    ))
}
