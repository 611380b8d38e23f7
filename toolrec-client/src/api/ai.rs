//! Assistant chat and recommendations

use crate::api::acknowledge;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse, Tool};

pub async fn chat(client: &ApiClient, request: &ChatRequest) -> Result<ChatResponse> {
    client.post("/ai/chat", request).await
}

/// Start a conversation; returns its session id.
pub async fn create_chat_session(client: &ApiClient) -> Result<String> {
    client.post_empty("/ai/chat/session").await
}

pub async fn chat_history(client: &ApiClient, session_id: &str) -> Result<Vec<ChatResponse>> {
    client.get(&format!("/ai/chat/history/{}", session_id)).await
}

pub async fn clear_chat_history(client: &ApiClient, session_id: &str) -> Result<()> {
    acknowledge(client.delete(&format!("/ai/chat/history/{}", session_id)).await)
}

/// `GET /ai/recommend?query=&limit=`
pub async fn recommend_tools(client: &ApiClient, query: &str, limit: u32) -> Result<Vec<Tool>> {
    let options = RequestOptions::new()
        .query("query", query)
        .query("limit", limit);
    client.get_with("/ai/recommend", options).await
}

pub async fn similar_tools(client: &ApiClient, tool_id: i64, limit: u32) -> Result<Vec<Tool>> {
    client
        .get_with(
            &format!("/ai/recommend/similar/{}", tool_id),
            RequestOptions::new().query("limit", limit),
        )
        .await
}

/// Recommendations based on the signed-in user's activity.
pub async fn personalized(client: &ApiClient, limit: u32) -> Result<Vec<Tool>> {
    client
        .get_with("/ai/recommend/personalized", RequestOptions::new().query("limit", limit))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::client;
    use crate::transport::MockTransport;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_chat_round_trip() {
        let (client, transport) = client(MockTransport::new().with_success(json!({
            "sessionId": "s-1",
            "message": "Try Midjourney for concept art.",
            "recommendedTools": [{"id": 2, "name": "Midjourney"}],
            "intent": "recommend",
            "responseTime": 840
        })));

        let request = ChatRequest {
            message: "I need concept art".into(),
            recommend_count: Some(3),
            ..Default::default()
        };
        let reply = chat(&client, &request).await.unwrap();
        assert_eq!(reply.session_id, "s-1");
        assert_eq!(reply.recommended_tools[0].id, 2);
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(json!({"message": "I need concept art", "recommendCount": 3}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recommend_sends_query() {
        let (client, transport) = client(
            MockTransport::new().with_success(json!([{"id": 9, "name": "Cursor"}])),
        );

        let tools = recommend_tools(&client, "refactor rust", 5).await.unwrap();
        assert_eq!(tools[0].name, "Cursor");
        assert_eq!(
            transport.last_request().unwrap().query,
            vec![
                ("query".to_string(), "refactor rust".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_similar_and_personalized_paths() {
        let (client, transport) = client(
            MockTransport::new()
                .with_success(json!([]))
                .with_success(json!([{"id": 4, "name": "Claude"}])),
        );

        assert!(similar_tools(&client, 9, 6).await.unwrap().is_empty());
        assert_eq!(personalized(&client, 3).await.unwrap()[0].id, 4);

        let sent = transport.requests();
        assert_eq!(sent[0].path, "/ai/recommend/similar/9");
        assert_eq!(sent[1].path, "/ai/recommend/personalized");
        assert_eq!(sent[1].query, vec![("limit".to_string(), "3".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_and_history() {
        let (client, transport) = client(
            MockTransport::new()
                .with_success(json!("s-2"))
                .with_success(json!([]))
                .with_success(json!("cleared")),
        );

        let id = create_chat_session(&client).await.unwrap();
        assert!(chat_history(&client, &id).await.unwrap().is_empty());
        clear_chat_history(&client, &id).await.unwrap();

        assert_eq!(transport.requests()[2].path, "/ai/chat/history/s-2");
    }
}
