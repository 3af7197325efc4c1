use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::history::model::{ReadRecord, TrackReadRequest};
use crate::history::store::HistoryStore;
use crate::utils::error::CustomError;
use crate::utils::helpers::require_non_empty;

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;
pub const MAX_HISTORY_LIMIT: u32 = 100;
pub const PREFERRED_CATEGORY_COUNT: usize = 3;

pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        HistoryService { store }
    }

    /// Record that a user read an article; re-reading only refreshes `read_at`.
    pub async fn track_read(&self, request: TrackReadRequest) -> Result<ReadRecord, CustomError> {
        let user_id = require_non_empty(&request.user_id, "User id")?;
        let article_slug = require_non_empty(&request.article_slug, "Article slug")?;
        let category = require_non_empty(&request.category, "Category")?;

        let record = self
            .store
            .upsert_read(&user_id, &article_slug, &category, Utc::now())
            .await?;
        log::debug!("user {} read {}", record.user_id, record.article_slug);
        Ok(record)
    }

    pub async fn get_history(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ReadRecord>, CustomError> {
        let user_id = require_non_empty(user_id, "User id")?;
        let limit = limit
            .map(|l| l.clamp(1, i64::from(MAX_HISTORY_LIMIT)) as u32)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.store.recent(&user_id, limit).await
    }

    /// The user's most-read categories, most frequent first.
    pub async fn preferred_categories(&self, user_id: &str) -> Result<Vec<String>, CustomError> {
        let user_id = require_non_empty(user_id, "User id")?;
        let history = self.store.all_for_user(&user_id).await?;
        Ok(top_categories(&history, PREFERRED_CATEGORY_COUNT))
    }
}

fn top_categories(history: &[ReadRecord], n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in history {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(category, _)| category.to_string())
        .collect()
}
