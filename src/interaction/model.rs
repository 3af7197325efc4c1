use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
    /// Clears whatever vote the voter had.
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
    pub score: i64,
}

impl VoteTally {
    pub fn new(upvotes: u64, downvotes: u64) -> Self {
        VoteTally {
            upvotes,
            downvotes,
            score: upvotes as i64 - downvotes as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteResult {
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookmarkState {
    pub bookmarked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleIdQuery {
    pub article_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub article_id: String,
    #[serde(alias = "oderId")]
    pub voter_id: String,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVoteQuery {
    pub article_id: String,
    #[serde(alias = "oderId")]
    pub voter_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    pub user_id: String,
    pub article_id: String,
}
