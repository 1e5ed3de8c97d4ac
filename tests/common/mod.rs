//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use app_gate::config::GateConfig;
use app_gate::gate::{AccessGate, SessionIdentity};
use app_gate::http::server::{build_router, AppState};
use app_gate::insights::{DateRange, Pagination, ProjectAccess, QueryStat, QueryStatsStore, StoreError};
use app_gate::session::{SessionError, SessionProvider};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, Response};
use axum::Router;
use tokio::net::TcpListener;

pub const MEMBER_TOKEN: &str = "member-token";
pub const OUTSIDER_TOKEN: &str = "outsider-token";
pub const PROJECT_ID: &str = "proj-1";

/// Session provider keyed by bearer token.
#[derive(Default)]
pub struct StaticSessions {
    users: HashMap<String, String>,
    failing: bool,
}

impl StaticSessions {
    pub fn new() -> Self {
        let mut users = HashMap::new();
        users.insert(MEMBER_TOKEN.to_string(), "member".to_string());
        users.insert(OUTSIDER_TOKEN.to_string(), "outsider".to_string());
        Self { users, failing: false }
    }

    pub fn failing() -> Self {
        Self { users: HashMap::new(), failing: true }
    }
}

#[async_trait]
impl SessionProvider for StaticSessions {
    async fn identity(&self, headers: &HeaderMap) -> Result<SessionIdentity, SessionError> {
        if self.failing {
            return Err(SessionError::UnexpectedStatus(500));
        }
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        Ok(match token.and_then(|t| self.users.get(t)) {
            Some(user) => SessionIdentity::present(user.clone()),
            None => SessionIdentity::Absent,
        })
    }
}

/// What the fake store answers.
pub enum StoreReply {
    Rows(Vec<QueryStat>),
    NoResultSet,
    Fail(&'static str),
}

/// In-memory data store that records the last stats request.
pub struct FakeStore {
    reply: StoreReply,
    pub last_call: Mutex<Option<(String, DateRange, Pagination)>>,
}

impl FakeStore {
    pub fn new(reply: StoreReply) -> Self {
        Self { reply, last_call: Mutex::new(None) }
    }

    pub fn last_call(&self) -> Option<(String, DateRange, Pagination)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryStatsStore for FakeStore {
    async fn query_stats(
        &self,
        project_id: &str,
        range: DateRange,
        page: Pagination,
    ) -> Result<Option<Vec<QueryStat>>, StoreError> {
        *self.last_call.lock().unwrap() = Some((project_id.to_string(), range, page));
        match &self.reply {
            StoreReply::Rows(rows) => Ok(Some(rows.clone())),
            StoreReply::NoResultSet => Ok(None),
            StoreReply::Fail(msg) => Err(StoreError::Query(msg.to_string())),
        }
    }
}

#[async_trait]
impl ProjectAccess for FakeStore {
    async fn has_access(&self, user_id: &str, project_id: &str) -> Result<bool, StoreError> {
        Ok(user_id == "member" && project_id == PROJECT_ID)
    }
}

pub fn sample_stat(id: &str) -> QueryStat {
    QueryStat {
        id: id.to_string(),
        created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
        prompt: Some("How do I reset my password?".to_string()),
        no_response: Some(false),
        feedback: None,
    }
}

pub fn state_with(sessions: StaticSessions, store: Arc<FakeStore>) -> AppState {
    AppState::new(AccessGate::default(), Arc::new(sessions), store.clone(), store)
}

/// Router with default config and the given store.
pub fn app(store: Arc<FakeStore>) -> Router {
    build_router(&GateConfig::default(), state_with(StaticSessions::new(), store))
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token)
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn json_body(res: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve `router` on an ephemeral local port.
pub async fn start_mock_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
