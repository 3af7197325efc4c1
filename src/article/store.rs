use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::article::model::Article;
use crate::utils::error::CustomError;

const DUPLICATE_KEY: i32 = 11000;

/// Which articles a listing should return. Unset fields match everything.
#[derive(Debug, Default, Clone)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl ArticleFilter {
    fn matches(&self, article: &Article) -> bool {
        self.category
            .as_deref()
            .is_none_or(|c| article.category == c)
            && self.featured.is_none_or(|f| article.featured == f)
    }

    fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(category) = &self.category {
            filter.insert("category", category.as_str());
        }
        if let Some(featured) = self.featured {
            filter.insert("featured", featured);
        }
        filter
    }
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fails with a validation error when the slug is taken.
    async fn insert(&self, article: &Article) -> Result<(), CustomError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, CustomError>;

    /// Matching articles, most recently published first.
    async fn find(
        &self,
        filter: &ArticleFilter,
        limit: Option<u32>,
    ) -> Result<Vec<Article>, CustomError>;

    /// Distinct categories in alphabetical order.
    async fn categories(&self) -> Result<Vec<String>, CustomError>;
}

fn slug_taken(slug: &str) -> CustomError {
    CustomError::ValidationError(format!("An article with slug {} already exists", slug))
}

#[derive(Default)]
pub struct MemoryArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn insert(&self, article: &Article) -> Result<(), CustomError> {
        let mut articles = self.articles.write().await;
        if articles.iter().any(|a| a.slug == article.slug) {
            return Err(slug_taken(&article.slug));
        }
        articles.push(article.clone());
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, CustomError> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.slug == slug).cloned())
    }

    async fn find(
        &self,
        filter: &ArticleFilter,
        limit: Option<u32>,
    ) -> Result<Vec<Article>, CustomError> {
        let articles = self.articles.read().await;
        let mut found: Vec<Article> = articles
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        if let Some(limit) = limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }

    async fn categories(&self) -> Result<Vec<String>, CustomError> {
        let articles = self.articles.read().await;
        let mut categories: Vec<String> = articles.iter().map(|a| a.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ArticleDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    slug: String,
    excerpt: String,
    content: String,
    category: String,
    image_url: String,
    author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author_image: Option<String>,
    featured: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read_time: Option<u32>,
}

impl From<&Article> for ArticleDocument {
    fn from(a: &Article) -> Self {
        ArticleDocument {
            id: a.id.clone(),
            title: a.title.clone(),
            slug: a.slug.clone(),
            excerpt: a.excerpt.clone(),
            content: a.content.clone(),
            category: a.category.clone(),
            image_url: a.image_url.clone(),
            author: a.author.clone(),
            author_image: a.author_image.clone(),
            featured: a.featured,
            published_at: a.published_at,
            read_time: a.read_time,
        }
    }
}

impl From<ArticleDocument> for Article {
    fn from(d: ArticleDocument) -> Self {
        Article {
            id: d.id,
            title: d.title,
            slug: d.slug,
            excerpt: d.excerpt,
            content: d.content,
            category: d.category,
            image_url: d.image_url,
            author: d.author,
            author_image: d.author_image,
            featured: d.featured,
            published_at: d.published_at,
            read_time: d.read_time,
        }
    }
}

pub struct MongoArticleStore {
    collection: Collection<ArticleDocument>,
}

impl MongoArticleStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<ArticleDocument>("articles");
        MongoArticleStore { collection }
    }

    /// Unique slug, plus the category and featured listings by publish date.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1, "published_at": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "featured": 1, "published_at": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "published_at": -1 })
                .build(),
        ];
        self.collection.create_indexes(indexes).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create article indexes: {}", e))
        })?;
        Ok(())
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        *e.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn insert(&self, article: &Article) -> Result<(), CustomError> {
        self.collection
            .insert_one(ArticleDocument::from(article))
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    slug_taken(&article.slug)
                } else {
                    CustomError::InternalServerError(format!("Failed to add article: {}", e))
                }
            })?;
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, CustomError> {
        let found = self
            .collection
            .find_one(doc! { "slug": slug })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch article: {}", e))
            })?;
        Ok(found.map(Article::from))
    }

    async fn find(
        &self,
        filter: &ArticleFilter,
        limit: Option<u32>,
    ) -> Result<Vec<Article>, CustomError> {
        let mut find = self
            .collection
            .find(filter.to_document())
            .sort(doc! { "published_at": -1 });
        if let Some(limit) = limit {
            find = find.limit(i64::from(limit));
        }

        let cursor = find.await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to fetch articles: {}", e))
        })?;
        let documents: Vec<ArticleDocument> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect articles: {}", e))
        })?;

        Ok(documents.into_iter().map(Article::from).collect())
    }

    async fn categories(&self) -> Result<Vec<String>, CustomError> {
        let values = self
            .collection
            .distinct("category", doc! {})
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch categories: {}", e))
            })?;

        let mut categories: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}
