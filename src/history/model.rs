use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's latest read of one article.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadRecord {
    pub id: String,
    pub user_id: String,
    pub article_slug: String,
    pub category: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReadRequest {
    pub user_id: String,
    pub article_slug: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredCategoriesQuery {
    pub user_id: String,
}
