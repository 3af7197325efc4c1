use crate::interaction::model::{
    ArticleIdQuery, BookmarkRequest, UserIdQuery, UserVoteQuery, VoteRequest,
};
use crate::interaction::service::InteractionService;
use crate::utils::error::CustomError;
use crate::utils::helpers::envelope;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// GET /rpc/interactions.getVotes?articleId=...
pub async fn get_votes(
    interaction_service: web::Data<InteractionService>,
    query: web::Query<ArticleIdQuery>,
) -> Result<HttpResponse, CustomError> {
    let tally = interaction_service.get_votes(&query.article_id).await?;
    Ok(envelope(StatusCode::OK, "Votes retrieved successfully", tally))
}

/// POST /rpc/interactions.vote
pub async fn vote(
    interaction_service: web::Data<InteractionService>,
    body: web::Json<VoteRequest>,
) -> Result<HttpResponse, CustomError> {
    let result = interaction_service
        .vote(&body.article_id, &body.voter_id, body.vote_type)
        .await?;
    Ok(envelope(StatusCode::OK, "Vote recorded successfully", result))
}

/// GET /rpc/interactions.getUserVote?articleId=...&voterId=...
pub async fn get_user_vote(
    interaction_service: web::Data<InteractionService>,
    query: web::Query<UserVoteQuery>,
) -> Result<HttpResponse, CustomError> {
    let vote_type = interaction_service
        .get_user_vote(&query.article_id, &query.voter_id)
        .await?;
    Ok(envelope(
        StatusCode::OK,
        "Vote retrieved successfully",
        json!({ "type": vote_type }),
    ))
}

/// GET /rpc/interactions.getBookmarks?userId=...
pub async fn get_bookmarks(
    interaction_service: web::Data<InteractionService>,
    query: web::Query<UserIdQuery>,
) -> Result<HttpResponse, CustomError> {
    let bookmarks = interaction_service.get_bookmarks(&query.user_id).await?;
    Ok(envelope(
        StatusCode::OK,
        "Bookmarks retrieved successfully",
        bookmarks,
    ))
}

/// POST /rpc/interactions.toggleBookmark
pub async fn toggle_bookmark(
    interaction_service: web::Data<InteractionService>,
    body: web::Json<BookmarkRequest>,
) -> Result<HttpResponse, CustomError> {
    let state = interaction_service
        .toggle_bookmark(&body.user_id, &body.article_id)
        .await?;
    Ok(envelope(StatusCode::OK, "Bookmark toggled successfully", state))
}

/// GET /rpc/interactions.isBookmarked?userId=...&articleId=...
pub async fn is_bookmarked(
    interaction_service: web::Data<InteractionService>,
    query: web::Query<BookmarkRequest>,
) -> Result<HttpResponse, CustomError> {
    let bookmarked = interaction_service
        .is_bookmarked(&query.user_id, &query.article_id)
        .await?;
    Ok(envelope(
        StatusCode::OK,
        "Bookmark status retrieved successfully",
        bookmarked,
    ))
}
