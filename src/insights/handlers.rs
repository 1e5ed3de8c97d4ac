//! `GET /api/project/{id}/insights/queries`

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::http::response::json_error;
use crate::http::server::AppState;
use crate::insights::store::StoreError;
use crate::insights::types::{DateRange, InsightsQuery, Pagination, QueryStat};

#[derive(Debug, Serialize)]
pub struct QueriesResponse {
    pub queries: Vec<QueryStat>,
}

/// Failure modes of the endpoint.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("method not allowed")]
    InvalidMethod,

    #[error("Invalid date range.")]
    InvalidDateRange,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No results found.")]
    NotFound,
}

impl InsightsError {
    pub fn status(&self) -> StatusCode {
        match self {
            InsightsError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for InsightsError {
    fn into_response(self) -> Response {
        match self {
            InsightsError::InvalidMethod => self.status().into_response(),
            other => json_error(other.status(), other.to_string()),
        }
    }
}

pub async fn list_queries(
    State(state): State<AppState>,
    method: Method,
    Path(project_id): Path<String>,
    Query(params): Query<InsightsQuery>,
) -> Response {
    match fetch_queries(&state, &method, &project_id, &params).await {
        Ok(queries) => (StatusCode::OK, Json(QueriesResponse { queries })).into_response(),
        Err(e) => {
            tracing::debug!(project_id = %project_id, error = %e, "Insights query rejected");
            e.into_response()
        }
    }
}

async fn fetch_queries(
    state: &AppState,
    method: &Method,
    project_id: &str,
    params: &InsightsQuery,
) -> Result<Vec<QueryStat>, InsightsError> {
    if *method != Method::GET {
        return Err(InsightsError::InvalidMethod);
    }

    let page = Pagination::from_query(params.limit.as_deref(), params.page.as_deref());
    let range = DateRange::parse(params.from.as_deref(), params.to.as_deref())
        .map_err(|_| InsightsError::InvalidDateRange)?;

    state
        .stats
        .query_stats(project_id, range, page)
        .await?
        .ok_or(InsightsError::NotFound)
}
