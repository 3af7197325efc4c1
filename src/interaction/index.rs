use super::controller::{
    get_bookmarks, get_user_vote, get_votes, is_bookmarked, toggle_bookmark, vote,
};
use actix_web::web;

pub fn interaction_procedures(cfg: &mut web::ServiceConfig) {
    cfg.route("/interactions.getVotes", web::get().to(get_votes))
        .route("/interactions.vote", web::post().to(vote))
        .route("/interactions.getUserVote", web::get().to(get_user_vote))
        .route("/interactions.getBookmarks", web::get().to(get_bookmarks))
        .route("/interactions.toggleBookmark", web::post().to(toggle_bookmark))
        .route("/interactions.isBookmarked", web::get().to(is_bookmarked));
}
