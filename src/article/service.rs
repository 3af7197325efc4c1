use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::article::model::{Article, CreateArticleRequest};
use crate::article::store::{ArticleFilter, ArticleStore};
use crate::utils::error::CustomError;
use crate::utils::helpers::{optional_trimmed, require_non_empty};

pub const FEATURED_COUNT: u32 = 4;
pub const DEFAULT_LATEST_LIMIT: u32 = 10;
pub const MAX_LATEST_LIMIT: u32 = 100;

pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
}

impl ArticleService {
    pub fn new(store: Arc<dyn ArticleStore>) -> Self {
        ArticleService { store }
    }

    /// Every article, newest first.
    pub async fn list(&self) -> Result<Vec<Article>, CustomError> {
        self.store.find(&ArticleFilter::default(), None).await
    }

    /// The hero section: the newest featured articles.
    pub async fn featured(&self) -> Result<Vec<Article>, CustomError> {
        let filter = ArticleFilter {
            featured: Some(true),
            ..ArticleFilter::default()
        };
        self.store.find(&filter, Some(FEATURED_COUNT)).await
    }

    /// `None` when no article carries the slug.
    pub async fn by_slug(&self, slug: &str) -> Result<Option<Article>, CustomError> {
        self.store.find_by_slug(slug).await
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<Article>, CustomError> {
        let filter = ArticleFilter {
            category: Some(category.to_string()),
            ..ArticleFilter::default()
        };
        self.store.find(&filter, None).await
    }

    /// Newest non-featured articles for the grid below the hero section.
    pub async fn latest(&self, limit: Option<i64>) -> Result<Vec<Article>, CustomError> {
        let limit = limit
            .map(|l| l.clamp(1, i64::from(MAX_LATEST_LIMIT)) as u32)
            .unwrap_or(DEFAULT_LATEST_LIMIT);
        let filter = ArticleFilter {
            featured: Some(false),
            ..ArticleFilter::default()
        };
        self.store.find(&filter, Some(limit)).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, CustomError> {
        self.store.categories().await
    }

    /// Publish an article now. Slugs are unique.
    pub async fn create(&self, request: CreateArticleRequest) -> Result<Article, CustomError> {
        let article = Article {
            id: Uuid::new_v4().to_string(),
            title: require_non_empty(&request.title, "Title")?,
            slug: require_non_empty(&request.slug, "Slug")?,
            excerpt: require_non_empty(&request.excerpt, "Excerpt")?,
            content: require_non_empty(&request.content, "Content")?,
            category: require_non_empty(&request.category, "Category")?,
            image_url: require_non_empty(&request.image_url, "Image url")?,
            author: require_non_empty(&request.author, "Author")?,
            author_image: optional_trimmed(request.author_image.as_deref()),
            featured: request.featured,
            published_at: Utc::now(),
            read_time: request.read_time,
        };

        self.store.insert(&article).await?;
        log::info!("article {} published in {}", article.slug, article.category);

        Ok(article)
    }
}
