//! PostgREST-backed data store (service role, bypasses row-level security).

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::SupabaseConfig;
use crate::insights::store::{ProjectAccess, QueryStatsStore, StoreError};
use crate::insights::types::{DateRange, Pagination, QueryStat};

const QUERY_STAT_COLUMNS: &str = "id,created_at,prompt,no_response,feedback";

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    team_id: String,
}

/// Admin client for the `/rest/v1` API.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    rest_url: String,
    service_key: String,
}

impl PostgrestClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            service_key: config.service_role_key.clone(),
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let res = self
            .client
            .get(format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = match res.json::<PostgrestError>().await {
                Ok(body) => body.message,
                Err(_) => format!("data store returned {}", status),
            };
            tracing::warn!(table, status = %status, error = %message, "Data store query failed");
            return Err(StoreError::Query(message));
        }

        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl QueryStatsStore for PostgrestClient {
    async fn query_stats(
        &self,
        project_id: &str,
        range: DateRange,
        page: Pagination,
    ) -> Result<Option<Vec<QueryStat>>, StoreError> {
        let mut query = vec![
            ("select", QUERY_STAT_COLUMNS.to_string()),
            ("project_id", format!("eq.{project_id}")),
        ];
        if let Some(from) = range.from {
            query.push(("created_at", format!("gte.{}", from.to_rfc3339())));
        }
        if let Some(to) = range.to {
            query.push(("created_at", format!("lte.{}", to.to_rfc3339())));
        }
        query.push(("order", "created_at.desc".to_string()));
        query.push(("offset", page.offset().to_string()));
        query.push(("limit", page.limit.to_string()));

        self.select("query_stats", &query).await
    }
}

#[async_trait]
impl ProjectAccess for PostgrestClient {
    async fn has_access(&self, user_id: &str, project_id: &str) -> Result<bool, StoreError> {
        let projects: Vec<ProjectRow> = self
            .select(
                "projects",
                &[
                    ("select", "team_id".to_string()),
                    ("id", format!("eq.{project_id}")),
                ],
            )
            .await?;

        let Some(project) = projects.into_iter().next() else {
            return Ok(false);
        };

        let memberships: Vec<serde_json::Value> = self
            .select(
                "memberships",
                &[
                    ("select", "id".to_string()),
                    ("user_id", format!("eq.{user_id}")),
                    ("team_id", format!("eq.{}", project.team_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(!memberships.is_empty())
    }
}
