use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    pub featured: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub published_at: DateTime<Utc>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub author: String,
    #[serde(default)]
    pub author_image: Option<String>,
    pub featured: bool,
    #[serde(default)]
    pub read_time: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_optional_fields_default_to_none() {
        let req: CreateArticleRequest = serde_json::from_value(json!({
            "title": "T",
            "slug": "t",
            "excerpt": "e",
            "content": "c",
            "category": "World",
            "imageUrl": "/img.png",
            "author": "Ada",
            "featured": false,
        }))
        .unwrap();
        assert_eq!(req.image_url, "/img.png");
        assert!(req.author_image.is_none());
        assert!(req.read_time.is_none());
    }

    #[test]
    fn article_serializes_camel_case_with_millis() {
        use chrono::TimeZone;
        let article = Article {
            id: "a1".to_string(),
            title: "T".to_string(),
            slug: "t".to_string(),
            excerpt: "e".to_string(),
            content: "c".to_string(),
            category: "World".to_string(),
            image_url: "/img.png".to_string(),
            author: "Ada".to_string(),
            author_image: None,
            featured: true,
            published_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            read_time: Some(4),
        };
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["imageUrl"], "/img.png");
        assert_eq!(value["publishedAt"], 1_700_000_000_000_i64);
        assert_eq!(value["readTime"], 4);
        assert!(value.get("authorImage").is_none());
    }
}
