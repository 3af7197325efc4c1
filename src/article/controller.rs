use crate::article::model::{CategoryQuery, CreateArticleRequest, LatestQuery, SlugQuery};
use crate::article::service::ArticleService;
use crate::middleware::auth::authorize_moderator;
use crate::utils::config::AppConfig;
use crate::utils::error::CustomError;
use crate::utils::helpers::envelope;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;

/// GET /rpc/articles.list
pub async fn list_articles(
    article_service: web::Data<ArticleService>,
) -> Result<HttpResponse, CustomError> {
    let articles = article_service.list().await?;
    Ok(envelope(StatusCode::OK, "Articles retrieved successfully", articles))
}

/// GET /rpc/articles.getFeatured
pub async fn get_featured(
    article_service: web::Data<ArticleService>,
) -> Result<HttpResponse, CustomError> {
    let articles = article_service.featured().await?;
    Ok(envelope(
        StatusCode::OK,
        "Featured articles retrieved successfully",
        articles,
    ))
}

/// An unknown slug answers with `data: null`
/// GET /rpc/articles.getBySlug?slug=...
pub async fn get_by_slug(
    article_service: web::Data<ArticleService>,
    query: web::Query<SlugQuery>,
) -> Result<HttpResponse, CustomError> {
    let article = article_service.by_slug(&query.slug).await?;
    Ok(envelope(StatusCode::OK, "Article retrieved successfully", article))
}

/// GET /rpc/articles.getByCategory?category=...
pub async fn get_by_category(
    article_service: web::Data<ArticleService>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, CustomError> {
    let articles = article_service.by_category(&query.category).await?;
    Ok(envelope(StatusCode::OK, "Articles retrieved successfully", articles))
}

/// GET /rpc/articles.getLatest?limit=...
pub async fn get_latest(
    article_service: web::Data<ArticleService>,
    query: web::Query<LatestQuery>,
) -> Result<HttpResponse, CustomError> {
    let articles = article_service.latest(query.limit).await?;
    Ok(envelope(
        StatusCode::OK,
        "Latest articles retrieved successfully",
        articles,
    ))
}

/// GET /rpc/articles.getCategories
pub async fn get_categories(
    article_service: web::Data<ArticleService>,
) -> Result<HttpResponse, CustomError> {
    let categories = article_service.categories().await?;
    Ok(envelope(
        StatusCode::OK,
        "Categories retrieved successfully",
        categories,
    ))
}

/// Publishing is an editorial action and takes the moderation bearer token
/// POST /rpc/articles.create
pub async fn create_article(
    article_service: web::Data<ArticleService>,
    config: web::Data<AppConfig>,
    credentials: Option<BearerAuth>,
    body: web::Json<CreateArticleRequest>,
) -> Result<HttpResponse, CustomError> {
    authorize_moderator(&config, credentials.as_ref())?;

    let article = article_service.create(body.into_inner()).await?;

    Ok(envelope(
        StatusCode::CREATED,
        "Article created successfully",
        article,
    ))
}
