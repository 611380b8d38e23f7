//! Payload types for the catalog API

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub current: u64,
    pub size: u64,
}

/// Tool tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub upvote_count: Option<i64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Sort key for tool listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first
    Launch,
    /// Highest average rating first
    Rating,
    /// Most upvoted first
    #[default]
    Upvote,
    /// Most viewed first (server side only; the offline catalog sorts by upvotes)
    View,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Rating => "rating",
            Self::Upvote => "upvote",
            Self::View => "view",
        }
    }

    /// Lenient parse; unknown keys sort by popularity.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "launch" | "recency" | "latest" => Self::Launch,
            "rating" => Self::Rating,
            "view" => Self::View,
            _ => Self::Upvote,
        }
    }
}

/// Tool listing query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub sort_by: SortBy,
    /// Page number, 1-based
    pub current: u64,
    pub size: u64,
}

impl Default for ToolQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            category_id: None,
            sort_by: SortBy::Upvote,
            current: 1,
            size: 12,
        }
    }
}

impl ToolQuery {
    pub fn page(current: u64, size: u64) -> Self {
        Self {
            current,
            size,
            ..Default::default()
        }
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Tool category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tool_count: Option<i64>,
}

/// Signed-in user as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Credentials for `/users/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Username, email or phone
    pub account: String,
    pub password: String,
}

/// Payload of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: serde_json::Value,
}

/// Body for `/users/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Profile fields for `PUT /users/info`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Tool review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub tool_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub helpful_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Body for `POST /reviews`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub tool_id: i64,
    pub rating: i32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Body for `POST /ratings`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub tool_id: i64,
    /// 1 to 5
    pub score: i32,
}

/// Rating summary for one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<i64>,
    /// The caller's own score, when signed in and rated
    #[serde(default)]
    pub user_score: Option<i32>,
}

/// Body for `POST /submissions`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub name: String,
    pub website_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_model: Option<String>,
}

/// A submitted tool awaiting or past moderation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    /// 0 pending, 1 approved, 2 rejected
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub status_desc: Option<String>,
    #[serde(default)]
    pub review_comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Body for `POST /ai/chat`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Continue an existing conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_recommendation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend_count: Option<u32>,
}

/// Assistant reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub recommended_tools: Vec<Tool>,
    #[serde(default)]
    pub intent: Option<String>,
    /// Milliseconds
    #[serde(default)]
    pub response_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_deserializes_server_shape() {
        let json = r#"{
            "id": 9,
            "name": "Cursor",
            "categoryId": 3,
            "averageRating": 4.8,
            "upvoteCount": 1100,
            "tags": [{"id": 6, "name": "coding"}],
            "createdAt": "2024-03-15T12:25:00",
            "viewCount": 12
        }"#;
        let tool: Tool = serde_json::from_str(json).unwrap();
        assert_eq!(tool.category_id, Some(3));
        assert_eq!(tool.tags.len(), 1);
        assert_eq!(
            tool.created_at.unwrap().to_string(),
            "2024-03-15 12:25:00"
        );
    }

    #[test]
    fn test_query_serializes_camel_case() {
        let query = ToolQuery::page(2, 6).in_category(4).sorted_by(SortBy::Rating);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"categoryId": 4, "sortBy": "rating", "current": 2, "size": 6})
        );
    }

    #[test]
    fn test_sort_parse_is_lenient() {
        assert_eq!(SortBy::parse("RATING"), SortBy::Rating);
        assert_eq!(SortBy::parse("recency"), SortBy::Launch);
        assert_eq!(SortBy::parse("popularity"), SortBy::Upvote);
        assert_eq!(SortBy::parse(""), SortBy::Upvote);
    }
}
