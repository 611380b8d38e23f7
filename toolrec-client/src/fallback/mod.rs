//! Degraded mode for read-only listing calls
//!
//! When the catalog service cannot be reached, wrapped reads are answered
//! from the bundled [`StaticCatalog`] after a short simulated latency.
//! Only transport-level failures are absorbed; business and authorization
//! errors still reach the caller.

mod catalog;

pub use catalog::StaticCatalog;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::client::ApiClient;
use crate::config::FallbackConfig;
use crate::error::Result;
use crate::types::{PageResult, SortBy, Tool, ToolQuery};

/// Wraps designated read calls with the offline catalog
#[derive(Clone)]
pub struct FallbackRouter {
    client: ApiClient,
    catalog: Arc<StaticCatalog>,
    config: FallbackConfig,
}

impl FallbackRouter {
    pub fn new(client: ApiClient, catalog: StaticCatalog) -> Self {
        let config = client.config().fallback.clone();
        Self {
            client,
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// Router over the bundled catalog.
    pub fn bundled(client: ApiClient) -> Result<Self> {
        Ok(Self::new(client, StaticCatalog::bundled()?))
    }

    pub fn with_config(mut self, config: FallbackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }

    /// Run `call`; on a transport failure answer with `local` instead.
    pub async fn guard<T, Fut>(
        &self,
        operation: &str,
        call: Fut,
        local: impl FnOnce(&StaticCatalog) -> T,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match call.await {
            Err(e) if self.config.enabled && e.is_transport() => {
                warn!(operation, "Backend unavailable, using offline catalog: {}", e);
                tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
                Ok(local(&self.catalog))
            }
            other => other,
        }
    }

    /// `POST /tools/query`
    pub async fn query_tools(&self, query: &ToolQuery) -> Result<PageResult<Tool>> {
        self.guard(
            "query_tools",
            self.client.post("/tools/query", query),
            |catalog| catalog.query(query),
        )
        .await
    }

    /// `GET /tools/hot?limit=`
    pub async fn hot_tools(&self, limit: u64) -> Result<Vec<Tool>> {
        self.guard(
            "hot_tools",
            crate::api::tools::hot_tools(&self.client, limit),
            |catalog| {
                catalog
                    .query(&ToolQuery::page(1, limit).sorted_by(SortBy::Upvote))
                    .records
            },
        )
        .await
    }

    /// `GET /tools/latest?limit=`
    pub async fn latest_tools(&self, limit: u64) -> Result<Vec<Tool>> {
        self.guard(
            "latest_tools",
            crate::api::tools::latest_tools(&self.client, limit),
            |catalog| {
                catalog
                    .query(&ToolQuery::page(1, limit).sorted_by(SortBy::Launch))
                    .records
            },
        )
        .await
    }
}
