use super::controller::{
    create_article, get_by_category, get_by_slug, get_categories, get_featured, get_latest,
    list_articles,
};
use actix_web::web;

pub fn article_procedures(cfg: &mut web::ServiceConfig) {
    cfg.route("/articles.list", web::get().to(list_articles))
        .route("/articles.getFeatured", web::get().to(get_featured))
        .route("/articles.getBySlug", web::get().to(get_by_slug))
        .route("/articles.getByCategory", web::get().to(get_by_category))
        .route("/articles.getLatest", web::get().to(get_latest))
        .route("/articles.getCategories", web::get().to(get_categories))
        .route("/articles.create", web::post().to(create_article));
}
