use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::history::model::ReadRecord;
use crate::utils::error::CustomError;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Insert the record for `(user_id, article_slug)`, or refresh only its
    /// `read_at` when one exists. The category of the first read is kept.
    async fn upsert_read(
        &self,
        user_id: &str,
        article_slug: &str,
        category: &str,
        read_at: DateTime<Utc>,
    ) -> Result<ReadRecord, CustomError>;

    /// Most recent reads first.
    async fn recent(&self, user_id: &str, limit: u32) -> Result<Vec<ReadRecord>, CustomError>;

    async fn all_for_user(&self, user_id: &str) -> Result<Vec<ReadRecord>, CustomError>;
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    records: RwLock<Vec<ReadRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn upsert_read(
        &self,
        user_id: &str,
        article_slug: &str,
        category: &str,
        read_at: DateTime<Utc>,
    ) -> Result<ReadRecord, CustomError> {
        let mut records = self.records.write().await;
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.user_id == user_id && r.article_slug == article_slug)
        {
            existing.read_at = read_at;
            return Ok(existing.clone());
        }

        let record = ReadRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            article_slug: article_slug.to_string(),
            category: category.to_string(),
            read_at,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn recent(&self, user_id: &str, limit: u32) -> Result<Vec<ReadRecord>, CustomError> {
        let mut found = self.all_for_user(user_id).await?;
        found.sort_by(|a, b| b.read_at.cmp(&a.read_at));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn all_for_user(&self, user_id: &str) -> Result<Vec<ReadRecord>, CustomError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReadDocument {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    article_slug: String,
    category: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    read_at: DateTime<Utc>,
}

impl From<ReadDocument> for ReadRecord {
    fn from(d: ReadDocument) -> Self {
        ReadRecord {
            id: d.id,
            user_id: d.user_id,
            article_slug: d.article_slug,
            category: d.category,
            read_at: d.read_at,
        }
    }
}

pub struct MongoHistoryStore {
    collection: Collection<ReadDocument>,
}

impl MongoHistoryStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<ReadDocument>("read_history");
        MongoHistoryStore { collection }
    }

    /// Unique `(user_id, article_slug)` index backing the upsert.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "article_slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create history index: {}", e))
        })?;
        Ok(())
    }

    async fn find_for_user(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ReadRecord>, CustomError> {
        let mut find = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "read_at": -1 });
        if let Some(limit) = limit {
            find = find.limit(i64::from(limit));
        }

        let cursor = find.await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to fetch history: {}", e))
        })?;
        let documents: Vec<ReadDocument> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect history: {}", e))
        })?;

        Ok(documents.into_iter().map(ReadRecord::from).collect())
    }
}

#[async_trait]
impl HistoryStore for MongoHistoryStore {
    async fn upsert_read(
        &self,
        user_id: &str,
        article_slug: &str,
        category: &str,
        read_at: DateTime<Utc>,
    ) -> Result<ReadRecord, CustomError> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "user_id": user_id, "article_slug": article_slug },
                doc! {
                    "$set": { "read_at": read_at.timestamp_millis() },
                    "$setOnInsert": {
                        "_id": Uuid::new_v4().to_string(),
                        "category": category,
                    },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to track read: {}", e))
            })?;

        updated.map(ReadRecord::from).ok_or_else(|| {
            CustomError::InternalServerError("Upsert returned no read record".to_string())
        })
    }

    async fn recent(&self, user_id: &str, limit: u32) -> Result<Vec<ReadRecord>, CustomError> {
        self.find_for_user(user_id, Some(limit)).await
    }

    async fn all_for_user(&self, user_id: &str) -> Result<Vec<ReadRecord>, CustomError> {
        self.find_for_user(user_id, None).await
    }
}
