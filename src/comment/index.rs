use super::controller::{count_comments, list_threaded, remove_comment, submit_comment};
use actix_web::web;

pub fn comment_procedures(cfg: &mut web::ServiceConfig) {
    cfg.route("/comments.listThreaded", web::get().to(list_threaded))
        .route("/comments.count", web::get().to(count_comments))
        .route("/comments.submit", web::post().to(submit_comment))
        .route("/comments.remove", web::post().to(remove_comment));
}
