//! Review endpoints

use crate::api::acknowledge;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;
use crate::types::{NewReview, PageResult, Review};

pub async fn tool_reviews(
    client: &ApiClient,
    tool_id: i64,
    current: u64,
    size: u64,
) -> Result<PageResult<Review>> {
    let options = RequestOptions::new()
        .query("current", current)
        .query("size", size);
    client
        .get_with(&format!("/reviews/tool/{}", tool_id), options)
        .await
}

/// `POST /reviews`; returns the new review id.
pub async fn create_review(client: &ApiClient, review: &NewReview) -> Result<i64> {
    client.post("/reviews", review).await
}

pub async fn delete_review(client: &ApiClient, id: i64) -> Result<()> {
    acknowledge(client.delete(&format!("/reviews/{}", id)).await)
}

pub async fn mark_helpful(client: &ApiClient, id: i64) -> Result<()> {
    acknowledge(client.post_empty(&format!("/reviews/{}/helpful", id)).await)
}
