use crate::comment::model::{
    ArticleKeyQuery, CommentCount, RemoveCommentRequest, SubmitCommentRequest,
};
use crate::comment::service::CommentService;
use crate::middleware::auth::authorize_moderator;
use crate::utils::config::AppConfig;
use crate::utils::error::CustomError;
use crate::utils::helpers::envelope;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;

/// Threaded comments for an article
/// GET /rpc/comments.listThreaded?articleKey=...
pub async fn list_threaded(
    comment_service: web::Data<CommentService>,
    query: web::Query<ArticleKeyQuery>,
) -> Result<HttpResponse, CustomError> {
    let threads = comment_service.list_threaded(&query.article_key).await?;

    Ok(envelope(
        StatusCode::OK,
        "Comments retrieved successfully",
        threads,
    ))
}

/// GET /rpc/comments.count?articleKey=...
pub async fn count_comments(
    comment_service: web::Data<CommentService>,
    query: web::Query<ArticleKeyQuery>,
) -> Result<HttpResponse, CustomError> {
    let count = comment_service.count(&query.article_key).await?;

    Ok(envelope(
        StatusCode::OK,
        "Comment count retrieved successfully",
        CommentCount { count },
    ))
}

/// Submit a comment or a reply
/// POST /rpc/comments.submit
pub async fn submit_comment(
    comment_service: web::Data<CommentService>,
    body: web::Json<SubmitCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let comment = comment_service.submit(body.into_inner()).await?;

    Ok(envelope(
        StatusCode::CREATED,
        "Comment created successfully",
        comment,
    ))
}

/// Moderation removal, requires the moderation bearer token
/// POST /rpc/comments.remove
pub async fn remove_comment(
    comment_service: web::Data<CommentService>,
    config: web::Data<AppConfig>,
    credentials: Option<BearerAuth>,
    body: web::Json<RemoveCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    authorize_moderator(&config, credentials.as_ref())?;

    comment_service.remove(&body.comment_id).await?;

    Ok(envelope(
        StatusCode::OK,
        "Comment deleted successfully",
        (),
    ))
}
