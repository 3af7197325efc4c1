use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::comment::model::{Comment, CommentNode, SubmitCommentRequest};
use crate::comment::store::CommentStore;
use crate::comment::thread::{ORPHAN_POLICY, build_threads};
use crate::utils::error::CustomError;
use crate::utils::helpers::{optional_trimmed, require_non_empty};

pub struct CommentService {
    store: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        CommentService { store }
    }

    /// All comments of an article arranged as reply trees, newest thread first.
    pub async fn list_threaded(&self, article_key: &str) -> Result<Vec<CommentNode>, CustomError> {
        let comments = self.store.list_by_article(article_key).await?;
        Ok(build_threads(&comments, ORPHAN_POLICY))
    }

    /// Validate and persist a new comment or reply.
    ///
    /// Name and content are trimmed and must not be blank. A reply whose parent
    /// exists must share its article; a parent id that resolves to nothing is
    /// stored as given and the reply reads back as a top-level thread.
    pub async fn submit(&self, request: SubmitCommentRequest) -> Result<Comment, CustomError> {
        let article_key = request.article_key;
        if article_key.trim().is_empty() {
            return Err(CustomError::ValidationError("Article key is required".to_string()));
        }
        let author_name = require_non_empty(&request.author_name, "Author name")?;
        let content = require_non_empty(&request.content, "Content")?;
        let parent_id = optional_trimmed(request.parent_id.as_deref());

        if let Some(parent_id) = parent_id.as_deref() {
            let parent = self.store.get(parent_id).await?;
            if parent.is_some_and(|p| p.article_key != article_key) {
                return Err(CustomError::ValidationError(
                    "Parent comment belongs to a different article".to_string(),
                ));
            }
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            article_key,
            author_name,
            author_email: optional_trimmed(request.author_email.as_deref()),
            content,
            parent_id,
            created_at: Utc::now(),
        };

        self.store.insert(&comment).await?;
        log::info!(
            "comment {} added to {} (reply: {})",
            comment.id,
            comment.article_key,
            comment.parent_id.is_some()
        );

        Ok(comment)
    }

    /// Moderation removal. Replies are left in place and surface as
    /// top-level threads on the next listing.
    pub async fn remove(&self, comment_id: &str) -> Result<(), CustomError> {
        let comment_id = require_non_empty(comment_id, "Comment id")?;
        if !self.store.delete(&comment_id).await? {
            return Err(CustomError::NotFoundError("Comment not found".to_string()));
        }
        log::info!("comment {} removed by moderation", comment_id);
        Ok(())
    }

    pub async fn count(&self, article_key: &str) -> Result<u64, CustomError> {
        self.store.count_by_article(article_key).await
    }
}
