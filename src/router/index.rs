use crate::article::index::article_procedures;
use crate::comment::index::comment_procedures;
use crate::history::index::history_procedures;
use crate::interaction::index::interaction_procedures;
use crate::middleware::error_handler::input_configs;
use actix_web::web;

/// Queries are `GET /rpc/<router>.<procedure>` with the input in the query
/// string; mutations are `POST` with a JSON body.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(input_configs);
    cfg.service(
        web::scope("/rpc")
            .configure(article_procedures)
            .configure(comment_procedures)
            .configure(interaction_procedures)
            .configure(history_procedures),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::service::ArticleService;
    use crate::article::store::MemoryArticleStore;
    use crate::comment::service::CommentService;
    use crate::comment::store::MemoryCommentStore;
    use crate::history::service::HistoryService;
    use crate::history::store::MemoryHistoryStore;
    use crate::interaction::ledger::MemoryLedger;
    use crate::interaction::service::InteractionService;
    use crate::middleware::not_found::not_found;
    use crate::utils::config::AppConfig;
    use actix_web::http::StatusCode;
    use actix_web::middleware::ErrorHandlers;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    macro_rules! app {
        ($moderation_token:expr) => {{
            let token: Option<&str> = $moderation_token;
            let config = AppConfig::from_lookup(|key| match key {
                "MODERATION_TOKEN" => token.map(str::to_string),
                _ => None,
            })
            .unwrap();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::new(ArticleService::new(Arc::new(
                        MemoryArticleStore::new(),
                    ))))
                    .app_data(web::Data::new(CommentService::new(Arc::new(
                        MemoryCommentStore::new(),
                    ))))
                    .app_data(web::Data::new(InteractionService::new(Arc::new(
                        MemoryLedger::new(),
                    ))))
                    .app_data(web::Data::new(HistoryService::new(Arc::new(
                        MemoryHistoryStore::new(),
                    ))))
                    .configure(routes)
                    .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn vote_then_read_tally() {
        let app = app!(None);

        let req = test::TestRequest::post()
            .uri("/rpc/interactions.vote")
            .set_json(json!({"articleId": "a1", "voterId": "v1", "type": "up"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!({"score": 1}));

        let req = test::TestRequest::post()
            .uri("/rpc/interactions.vote")
            .set_json(json!({"articleId": "a1", "voterId": "v1", "type": "down"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!({"score": -1}));

        let req = test::TestRequest::get()
            .uri("/rpc/interactions.getVotes?articleId=a1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["data"],
            json!({"upvotes": 0, "downvotes": 1, "score": -1})
        );

        let req = test::TestRequest::get()
            .uri("/rpc/interactions.getUserVote?articleId=a1&voterId=v1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!({"type": "down"}));
    }

    #[actix_web::test]
    async fn unseen_article_reads_as_zero() {
        let app = app!(None);
        let req = test::TestRequest::get()
            .uri("/rpc/interactions.getVotes?articleId=never-seen")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["data"],
            json!({"upvotes": 0, "downvotes": 0, "score": 0})
        );
    }

    #[actix_web::test]
    async fn bookmark_toggle_round_trip() {
        let app = app!(None);

        for expected in [true, false] {
            let req = test::TestRequest::post()
                .uri("/rpc/interactions.toggleBookmark")
                .set_json(json!({"userId": "u1", "articleId": "a1"}))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"], json!({"bookmarked": expected}));

            let req = test::TestRequest::get()
                .uri("/rpc/interactions.isBookmarked?userId=u1&articleId=a1")
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"], json!(expected));
        }

        let req = test::TestRequest::get()
            .uri("/rpc/interactions.getBookmarks?userId=u1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn malformed_input_is_a_structured_validation_error() {
        let app = app!(None);

        let req = test::TestRequest::post()
            .uri("/rpc/interactions.vote")
            .set_json(json!({"articleId": "a1", "voterId": "v1", "type": "sideways"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let req = test::TestRequest::get()
            .uri("/rpc/interactions.getVotes")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn comments_submit_and_list_as_threads() {
        let app = app!(None);

        let req = test::TestRequest::post()
            .uri("/rpc/comments.submit")
            .set_json(json!({
                "articleKey": "launch-day",
                "authorName": "Ada",
                "authorEmail": "ada@example.com",
                "content": "Congrats!",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let root_id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/rpc/comments.submit")
            .set_json(json!({
                "articleKey": "launch-day",
                "authorName": "Bob",
                "content": "Seconded",
                "parentId": root_id,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/rpc/comments.listThreaded?articleKey=launch-day")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let forest = body["data"].as_array().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0]["id"], root_id.as_str());
        assert!(forest[0].get("authorEmail").is_none());
        assert_eq!(forest[0]["replies"][0]["authorName"], "Bob");
        assert_eq!(forest[0]["replies"][0]["replies"], json!([]));

        let req = test::TestRequest::get()
            .uri("/rpc/comments.count?articleKey=launch-day")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!({"count": 2}));
    }

    #[actix_web::test]
    async fn blank_comment_is_rejected() {
        let app = app!(None);
        let req = test::TestRequest::post()
            .uri("/rpc/comments.submit")
            .set_json(json!({"articleKey": "a", "authorName": "Bob", "content": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Validation Error: Content is required");
    }

    #[actix_web::test]
    async fn removal_requires_the_moderation_token() {
        let app = app!(Some("s3cret"));

        let req = test::TestRequest::post()
            .uri("/rpc/comments.submit")
            .set_json(json!({"articleKey": "a", "authorName": "Eve", "content": "spam"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/rpc/comments.remove")
            .set_json(json!({"commentId": id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/rpc/comments.remove")
            .insert_header(("Authorization", "Bearer wrong"))
            .set_json(json!({"commentId": id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/rpc/comments.remove")
            .insert_header(("Authorization", "Bearer s3cret"))
            .set_json(json!({"commentId": id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/rpc/comments.remove")
            .insert_header(("Authorization", "Bearer s3cret"))
            .set_json(json!({"commentId": id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not Found: Comment not found");
    }

    #[actix_web::test]
    async fn reading_history_procedures() {
        let app = app!(None);

        for (slug, category) in [("a", "tech"), ("b", "tech"), ("c", "world")] {
            let req = test::TestRequest::post()
                .uri("/rpc/readHistory.trackRead")
                .set_json(json!({"userId": "u1", "articleSlug": slug, "category": category}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/rpc/readHistory.getPreferredCategories?userId=u1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!(["tech", "world"]));

        let req = test::TestRequest::get()
            .uri("/rpc/readHistory.getHistory?userId=u1&limit=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    fn new_article(slug: &str, category: &str, featured: bool) -> Value {
        json!({
            "title": format!("About {}", slug),
            "slug": slug,
            "excerpt": "excerpt",
            "content": "content",
            "category": category,
            "imageUrl": "/images/cover.png",
            "author": "Ada",
            "featured": featured,
            "readTime": 4,
        })
    }

    #[actix_web::test]
    async fn publishing_requires_the_moderation_token() {
        let app = app!(Some("s3cret"));

        let req = test::TestRequest::post()
            .uri("/rpc/articles.create")
            .set_json(new_article("launch", "Tech", true))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/rpc/articles.list").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn article_catalog_procedures() {
        let app = app!(Some("s3cret"));

        for (slug, category, featured) in [
            ("launch", "Tech", true),
            ("summit", "World", false),
            ("battery", "Tech", false),
        ] {
            let req = test::TestRequest::post()
                .uri("/rpc/articles.create")
                .insert_header(("Authorization", "Bearer s3cret"))
                .set_json(new_article(slug, category, featured))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::post()
            .uri("/rpc/articles.create")
            .insert_header(("Authorization", "Bearer s3cret"))
            .set_json(new_article("launch", "World", false))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/rpc/articles.getBySlug?slug=launch")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["category"], "Tech");
        assert_eq!(body["data"]["imageUrl"], "/images/cover.png");
        assert!(body["data"]["publishedAt"].is_i64());

        let req = test::TestRequest::get()
            .uri("/rpc/articles.getBySlug?slug=nope")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], Value::Null);

        let req = test::TestRequest::get().uri("/rpc/articles.getFeatured").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/rpc/articles.getLatest?limit=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let latest = body["data"].as_array().unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0]["featured"], false);

        let req = test::TestRequest::get()
            .uri("/rpc/articles.getByCategory?category=Tech")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get()
            .uri("/rpc/articles.getCategories")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!(["Tech", "World"]));
    }

    #[actix_web::test]
    async fn reply_to_a_missing_parent_is_accepted() {
        let app = app!(None);
        let req = test::TestRequest::post()
            .uri("/rpc/comments.submit")
            .set_json(json!({
                "articleKey": "a",
                "authorName": "Bob",
                "content": "late reply",
                "parentId": "99",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/rpc/comments.listThreaded?articleKey=a")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["parentId"], "99");
        assert_eq!(body["data"][0]["content"], "late reply");
    }

    #[actix_web::test]
    async fn unknown_procedure_is_a_json_404() {
        let app = app!(None);
        let req = test::TestRequest::get()
            .uri("/rpc/interactions.doesNotExist")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NOT_FOUND_ERROR");
    }
}
