//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, limits, gate)
//! - Build collaborators (session provider, data store, upstream) from config
//! - Bind server to listener, plain or TLS

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware,
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GateConfig;
use crate::gate::AccessGate;
use crate::http::middleware::{access_gate_middleware, project_access_middleware};
use crate::http::proxy::{forward_handler, Upstream};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::security_header_layers;
use crate::insights::handlers::list_queries;
use crate::insights::{PostgrestClient, ProjectAccess, QueryStatsStore};
use crate::routing::{AllowList, PatternError};
use crate::session::{SessionProvider, SupabaseSessionProvider};

pub const INSIGHTS_QUERIES_ROUTE: &str = "/api/project/{id}/insights/queries";

/// How long TLS connections get to drain on shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Errors while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid public path pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream address: {0}")]
    Upstream(#[from] axum::http::uri::InvalidUri),
}

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub gate_enabled: bool,
    pub sessions: Arc<dyn SessionProvider>,
    pub stats: Arc<dyn QueryStatsStore>,
    pub projects: Arc<dyn ProjectAccess>,
    pub upstream: Option<Upstream>,
}

impl AppState {
    pub fn new(
        gate: AccessGate,
        sessions: Arc<dyn SessionProvider>,
        stats: Arc<dyn QueryStatsStore>,
        projects: Arc<dyn ProjectAccess>,
    ) -> Self {
        Self {
            gate: Arc::new(gate),
            gate_enabled: true,
            sessions,
            stats,
            projects,
            upstream: None,
        }
    }

    pub fn with_gate_enabled(mut self, enabled: bool) -> Self {
        self.gate_enabled = enabled;
        self
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Build every collaborator from configuration.
    pub fn from_config(config: &GateConfig) -> Result<Self, ServerError> {
        let allow_list = AllowList::with_extra(&config.gate.extra_public_paths)?;
        let sessions = Arc::new(SupabaseSessionProvider::new(&config.supabase)?);
        let store = Arc::new(PostgrestClient::new(&config.supabase)?);

        let mut state = Self::new(AccessGate::new(allow_list), sessions, store.clone(), store)
            .with_gate_enabled(config.gate.enabled);

        if let Some(address) = &config.upstream.address {
            let connect = Duration::from_secs(config.timeouts.connect_secs);
            state = state.with_upstream(Upstream::new(address, connect)?);
        }

        Ok(state)
    }
}

/// HTTP server for the gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a new HTTP server with collaborators built from the configuration.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        Ok(Self::with_state(config, state))
    }

    /// Create a server around an already assembled state.
    pub fn with_state(config: GateConfig, state: AppState) -> Self {
        tracing::info!(
            public_patterns = state.gate.allow_list().len(),
            gate_enabled = state.gate_enabled,
            upstream = ?state.upstream.as_ref().map(|u| u.authority().to_string()),
            "Gate configured"
        );

        let router = build_router(&config, state);
        Self { router, config }
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the server until a shutdown signal is received.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS until a shutdown signal is received.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &GateConfig, state: AppState) -> Router {
    let insights = Router::new()
        .route(INSIGHTS_QUERIES_ROUTE, any(list_queries))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            project_access_middleware,
        ));

    let mut router = Router::new()
        .merge(insights)
        .fallback(forward_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access_gate_middleware,
        ))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

    if config.security.enable_headers {
        for layer in security_header_layers() {
            router = router.layer(layer);
        }
    }

    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            tracing::info_span!(
                "request",
                request_id = %req.request_id(),
                method = %req.method(),
                path = %req.uri().path(),
            )
        }))
        .layer(set_request_id_layer())
}
