//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{Method, OutboundRequest, RawResponse, Transport, TransportFailure};
use crate::config::ClientConfig;

/// Transport for the live catalog service
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Build a transport with the configured base URL and timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn map_error(&self, e: reqwest::Error) -> TransportFailure {
        if e.is_timeout() {
            TransportFailure::Timeout(self.timeout_ms)
        } else if e.is_connect() {
            TransportFailure::Connect(e.to_string())
        } else {
            TransportFailure::Other(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportFailure> {
        let url = self.url(&request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| TransportFailure::Other(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new(&ClientConfig {
            base_url: "http://localhost:8080/api/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080/api");
        assert_eq!(transport.url("/tools/1"), "http://localhost:8080/api/tools/1");
        assert_eq!(transport.url("categories"), "http://localhost:8080/api/categories");
    }
}
