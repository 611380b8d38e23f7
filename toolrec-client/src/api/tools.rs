//! Tool and category endpoints
//!
//! `query_tools`, `hot_tools` and `latest_tools` are also available through
//! [`FallbackRouter`](crate::fallback::FallbackRouter), which answers from the
//! offline catalog when the service is unreachable.

use crate::api::acknowledge;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;
use crate::types::{Category, PageResult, Tool, ToolQuery};

/// `POST /tools/query`, without offline fallback.
pub async fn query_tools(client: &ApiClient, query: &ToolQuery) -> Result<PageResult<Tool>> {
    client.post("/tools/query", query).await
}

pub async fn tool_detail(client: &ApiClient, id: i64) -> Result<Tool> {
    client.get(&format!("/tools/{}", id)).await
}

pub async fn hot_tools(client: &ApiClient, limit: u64) -> Result<Vec<Tool>> {
    client
        .get_with("/tools/hot", RequestOptions::new().query("limit", limit))
        .await
}

pub async fn latest_tools(client: &ApiClient, limit: u64) -> Result<Vec<Tool>> {
    client
        .get_with("/tools/latest", RequestOptions::new().query("limit", limit))
        .await
}

/// `GET /tools/search?keyword=&current=&size=`
pub async fn search_tools(
    client: &ApiClient,
    keyword: &str,
    current: u64,
    size: u64,
) -> Result<PageResult<Tool>> {
    let options = RequestOptions::new()
        .query("keyword", keyword)
        .query("current", current)
        .query("size", size);
    client.get_with("/tools/search", options).await
}

pub async fn upvote_tool(client: &ApiClient, id: i64) -> Result<()> {
    acknowledge(client.post_empty(&format!("/tools/{}/upvote", id)).await)
}

pub async fn categories(client: &ApiClient) -> Result<Vec<Category>> {
    client.get("/categories").await
}
