//! Favorite endpoints; all require a signed-in session

use crate::api::acknowledge;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;
use crate::types::{PageResult, Tool};

pub async fn add_favorite(client: &ApiClient, tool_id: i64) -> Result<()> {
    acknowledge(client.post_empty(&format!("/favorites/{}", tool_id)).await)
}

pub async fn remove_favorite(client: &ApiClient, tool_id: i64) -> Result<()> {
    acknowledge(client.delete(&format!("/favorites/{}", tool_id)).await)
}

pub async fn is_favorite(client: &ApiClient, tool_id: i64) -> Result<bool> {
    client.get(&format!("/favorites/{}/check", tool_id)).await
}

pub async fn my_favorites(client: &ApiClient, current: u64, size: u64) -> Result<PageResult<Tool>> {
    let options = RequestOptions::new()
        .query("current", current)
        .query("size", size);
    client.get_with("/favorites/my", options).await
}
