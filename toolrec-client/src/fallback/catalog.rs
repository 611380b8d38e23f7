//! Offline tool catalog

use std::cmp::Ordering;

use crate::types::{PageResult, SortBy, Tool, ToolQuery};

const BUNDLED: &str = include_str!("catalog.json");

/// Fixed in-memory tool list answering listing queries
///
/// Sorting is stable, so records that compare equal keep their insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tools: Vec<Tool>,
}

impl StaticCatalog {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    /// The catalog shipped with the client.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(BUNDLED)?))
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Filter by category, sort, then slice out the requested page.
    pub fn query(&self, query: &ToolQuery) -> PageResult<Tool> {
        let mut matching: Vec<&Tool> = self
            .tools
            .iter()
            .filter(|t| query.category_id.is_none() || t.category_id == query.category_id)
            .collect();

        matching.sort_by(|a, b| compare(query.sort_by, a, b));

        let current = query.current.max(1);
        let total = matching.len() as u64;
        let start = current.saturating_sub(1).saturating_mul(query.size).min(total);
        let end = start.saturating_add(query.size).min(total);

        PageResult {
            records: matching[start as usize..end as usize]
                .iter()
                .map(|t| (*t).clone())
                .collect(),
            total,
            current,
            size: query.size,
        }
    }

    /// Tool by id.
    pub fn get(&self, id: i64) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }
}

/// Descending by the sort key; missing values sort last.
fn compare(sort_by: SortBy, a: &Tool, b: &Tool) -> Ordering {
    match sort_by {
        SortBy::Launch => b.created_at.cmp(&a.created_at),
        SortBy::Rating => b
            .average_rating
            .unwrap_or(0.0)
            .total_cmp(&a.average_rating.unwrap_or(0.0)),
        SortBy::Upvote | SortBy::View => b
            .upvote_count
            .unwrap_or(0)
            .cmp(&a.upvote_count.unwrap_or(0)),
    }
}
