use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::comment::model::Comment;
use crate::utils::error::CustomError;

/// Persistence for comment records.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), CustomError>;

    async fn get(&self, comment_id: &str) -> Result<Option<Comment>, CustomError>;

    /// Returns whether a record was deleted.
    async fn delete(&self, comment_id: &str) -> Result<bool, CustomError>;

    /// All comments of an article, newest first.
    async fn list_by_article(&self, article_key: &str) -> Result<Vec<Comment>, CustomError>;

    async fn count_by_article(&self, article_key: &str) -> Result<u64, CustomError>;
}

#[derive(Default)]
pub struct MemoryCommentStore {
    comments: RwLock<Vec<Comment>>,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CustomError> {
        self.comments.write().await.push(comment.clone());
        Ok(())
    }

    async fn get(&self, comment_id: &str) -> Result<Option<Comment>, CustomError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn delete(&self, comment_id: &str) -> Result<bool, CustomError> {
        let mut comments = self.comments.write().await;
        match comments.iter().position(|c| c.id == comment_id) {
            Some(pos) => {
                comments.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_article(&self, article_key: &str) -> Result<Vec<Comment>, CustomError> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .iter()
            .filter(|c| c.article_key == article_key)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn count_by_article(&self, article_key: &str) -> Result<u64, CustomError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().filter(|c| c.article_key == article_key).count() as u64)
    }
}

/// Stored shape of a comment; the id lives in `_id`.
#[derive(Debug, Serialize, Deserialize)]
struct CommentDocument {
    #[serde(rename = "_id")]
    id: String,
    article_key: String,
    author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author_email: Option<String>,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentDocument {
    fn from(c: &Comment) -> Self {
        CommentDocument {
            id: c.id.clone(),
            article_key: c.article_key.clone(),
            author_name: c.author_name.clone(),
            author_email: c.author_email.clone(),
            content: c.content.clone(),
            parent_id: c.parent_id.clone(),
            created_at: c.created_at,
        }
    }
}

impl From<CommentDocument> for Comment {
    fn from(d: CommentDocument) -> Self {
        Comment {
            id: d.id,
            article_key: d.article_key,
            author_name: d.author_name,
            author_email: d.author_email,
            content: d.content,
            parent_id: d.parent_id,
            created_at: d.created_at,
        }
    }
}

pub struct MongoCommentStore {
    collection: Collection<CommentDocument>,
}

impl MongoCommentStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<CommentDocument>("comments");
        MongoCommentStore { collection }
    }

    /// Create the `(article_key, created_at)` index used by article listings.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let index = IndexModel::builder()
            .keys(doc! { "article_key": 1, "created_at": -1 })
            .build();
        self.collection.create_index(index).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create comment index: {}", e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CustomError> {
        self.collection
            .insert_one(CommentDocument::from(comment))
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to add comment: {}", e))
            })?;
        Ok(())
    }

    async fn get(&self, comment_id: &str) -> Result<Option<Comment>, CustomError> {
        let found = self
            .collection
            .find_one(doc! { "_id": comment_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comment: {}", e))
            })?;
        Ok(found.map(Comment::from))
    }

    async fn delete(&self, comment_id: &str) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": comment_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete comment: {}", e))
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn list_by_article(&self, article_key: &str) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "article_key": article_key })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comments: {}", e))
            })?;

        let documents: Vec<CommentDocument> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect comments: {}", e))
        })?;

        Ok(documents.into_iter().map(Comment::from).collect())
    }

    async fn count_by_article(&self, article_key: &str) -> Result<u64, CustomError> {
        self.collection
            .count_documents(doc! { "article_key": article_key })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to count comments: {}", e))
            })
    }
}
