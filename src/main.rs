use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use std::sync::Arc;

mod article;
mod comment;
mod database;
mod history;
mod interaction;
mod middleware;
mod router;
mod utils;

use article::service::ArticleService;
use article::store::{ArticleStore, MemoryArticleStore, MongoArticleStore};
use comment::service::CommentService;
use comment::store::{CommentStore, MemoryCommentStore, MongoCommentStore};
use history::service::HistoryService;
use history::store::{HistoryStore, MemoryHistoryStore, MongoHistoryStore};
use interaction::ledger::{InteractionLedger, MemoryLedger, RedisLedger};
use interaction::service::InteractionService;
use middleware::not_found::not_found;
use router::index::routes;
use serde_json::json;
use utils::config::{AppConfig, LedgerBackend, StorageBackend};
use utils::helpers::service_name;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Newsroom backend is running",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

fn startup_error<E: std::fmt::Display>(context: &str, e: E) -> std::io::Error {
    log::error!("{}: {}", context, e);
    std::io::Error::other(format!("{}: {}", context, e))
}

struct Stores {
    articles: Arc<dyn ArticleStore>,
    comments: Arc<dyn CommentStore>,
    history: Arc<dyn HistoryStore>,
}

async fn build_stores(config: &AppConfig) -> std::io::Result<Stores> {
    match config.storage {
        StorageBackend::Memory => {
            log::warn!("STORAGE_BACKEND=memory: articles, comments and reading history are not persisted");
            Ok(Stores {
                articles: Arc::new(MemoryArticleStore::new()),
                comments: Arc::new(MemoryCommentStore::new()),
                history: Arc::new(MemoryHistoryStore::new()),
            })
        }
        StorageBackend::Mongo => {
            let db = database::connect_to_mongo(&config.mongodb_uri, &config.mongodb_database)
                .await
                .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;

            let articles = MongoArticleStore::new(&db);
            articles
                .ensure_indexes()
                .await
                .map_err(|e| startup_error("Failed to prepare articles", e))?;

            let comments = MongoCommentStore::new(&db);
            comments
                .ensure_indexes()
                .await
                .map_err(|e| startup_error("Failed to prepare comments", e))?;

            let history = MongoHistoryStore::new(&db);
            history
                .ensure_indexes()
                .await
                .map_err(|e| startup_error("Failed to prepare reading history", e))?;

            Ok(Stores {
                articles: Arc::new(articles),
                comments: Arc::new(comments),
                history: Arc::new(history),
            })
        }
    }
}

async fn build_ledger(config: &AppConfig) -> std::io::Result<Arc<dyn InteractionLedger>> {
    match config.ledger {
        LedgerBackend::Memory => {
            info!("Votes and bookmarks are kept in process memory");
            Ok(Arc::new(MemoryLedger::new()))
        }
        LedgerBackend::Redis => {
            let client = database::connect_to_redis(&config.redis_url)
                .await
                .map_err(|e| startup_error("Failed to connect to Redis", e))?;
            Ok(Arc::new(RedisLedger::new(&client)))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    if config.moderation_token.is_none() {
        log::warn!("MODERATION_TOKEN is not set; publishing and comment removal are disabled");
    }

    let stores = build_stores(&config).await?;
    let ledger = build_ledger(&config).await?;

    // Created once so that every worker shares the same state.
    let article_service = web::Data::new(ArticleService::new(stores.articles));
    let comment_service = web::Data::new(CommentService::new(stores.comments));
    let interaction_service = web::Data::new(InteractionService::new(ledger));
    let history_service = web::Data::new(HistoryService::new(stores.history));
    let app_config = web::Data::new(config.clone());

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_config.clone())
            .app_data(article_service.clone())
            .app_data(comment_service.clone())
            .app_data(interaction_service.clone())
            .app_data(history_service.clone())
            .configure(routes)
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
            .service(default)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
