use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub article_key: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A comment as displayed, with its replies nested underneath.
///
/// `author_email` is deliberately absent: the tree is served to every reader.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub id: String,
    pub article_key: String,
    pub author_name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentNode>,
}

impl From<&Comment> for CommentNode {
    fn from(comment: &Comment) -> Self {
        CommentNode {
            id: comment.id.clone(),
            article_key: comment.article_key.clone(),
            author_name: comment.author_name.clone(),
            content: comment.content.clone(),
            parent_id: comment.parent_id.clone(),
            created_at: comment.created_at,
            replies: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCommentRequest {
    pub article_key: String,
    pub author_name: String,
    #[serde(default)]
    pub author_email: Option<String>,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleKeyQuery {
    pub article_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCommentRequest {
    pub comment_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CommentCount {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn comment_serializes_in_camel_case_with_millis() {
        let comment = Comment {
            id: "c1".to_string(),
            article_key: "rust-2024".to_string(),
            author_name: "Ada".to_string(),
            author_email: None,
            content: "Nice write-up".to_string(),
            parent_id: None,
            created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "c1",
                "articleKey": "rust-2024",
                "authorName": "Ada",
                "content": "Nice write-up",
                "createdAt": 1_700_000_000_123i64,
            })
        );
    }

    #[test]
    fn node_never_exposes_email() {
        let comment = Comment {
            id: "c1".to_string(),
            article_key: "a".to_string(),
            author_name: "Ada".to_string(),
            author_email: Some("ada@example.com".to_string()),
            content: "hi".to_string(),
            parent_id: Some("c0".to_string()),
            created_at: Utc.timestamp_millis_opt(0).unwrap(),
        };

        let value = serde_json::to_value(CommentNode::from(&comment)).unwrap();
        assert!(value.get("authorEmail").is_none());
        assert_eq!(value["parentId"], "c0");
        assert_eq!(value["replies"], json!([]));
    }
}
