//! Star ratings, separate from written reviews

use crate::api::acknowledge;
use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{NewRating, RatingStats};

/// `POST /ratings`; rating again replaces the previous score.
pub async fn submit_rating(client: &ApiClient, rating: &NewRating) -> Result<()> {
    acknowledge(client.post("/ratings", rating).await)
}

pub async fn rating_stats(client: &ApiClient, tool_id: i64) -> Result<RatingStats> {
    client.get(&format!("/ratings/tool/{}", tool_id)).await
}

pub async fn delete_rating(client: &ApiClient, tool_id: i64) -> Result<()> {
    acknowledge(client.delete(&format!("/ratings/tool/{}", tool_id)).await)
}

pub async fn has_rated(client: &ApiClient, tool_id: i64) -> Result<bool> {
    client.get(&format!("/ratings/tool/{}/check", tool_id)).await
}
