use super::controller::{get_history, get_preferred_categories, track_read};
use actix_web::web;

pub fn history_procedures(cfg: &mut web::ServiceConfig) {
    cfg.route("/readHistory.trackRead", web::post().to(track_read))
        .route("/readHistory.getHistory", web::get().to(get_history))
        .route(
            "/readHistory.getPreferredCategories",
            web::get().to(get_preferred_categories),
        );
}
