//! Data store collaborators of the insights endpoint.

use async_trait::async_trait;
use thiserror::Error;

use crate::insights::types::{DateRange, Pagination, QueryStat};

/// Errors from the data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected the query; carries the store's message.
    #[error("{0}")]
    Query(String),

    #[error("data store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Source of per-project query statistics.
#[async_trait]
pub trait QueryStatsStore: Send + Sync {
    /// One page of stats, newest first. `None` when the store returned no
    /// result set at all (as opposed to an empty one).
    async fn query_stats(
        &self,
        project_id: &str,
        range: DateRange,
        page: Pagination,
    ) -> Result<Option<Vec<QueryStat>>, StoreError>;
}

/// Project membership check.
#[async_trait]
pub trait ProjectAccess: Send + Sync {
    async fn has_access(&self, user_id: &str, project_id: &str) -> Result<bool, StoreError>;
}
