//! Access Gate Middleware.
//! Redirects anonymous visitors away from private pages and signed-in users
//! away from the login and signup pages.
//!
//! The path is normalized before the decision and the request URI is
//! rewritten to it, so whatever runs after the gate sees the decided path.

use axum::{
    extract::{Request, State},
    http::{uri::PathAndQuery, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::gate::{Decision, SessionIdentity};
use crate::http::request::RequestIdExt;
use crate::http::response::{json_error, redirect};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::normalize_path;

pub async fn access_gate_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    // Passthrough mode.
    if !state.gate_enabled {
        return next.run(req).await;
    }

    let identity = match state.sessions.identity(req.headers()).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!(request_id = %req.request_id(), error = %e, "Session lookup failed");
            metrics::record_session_error();
            return json_error(StatusCode::SERVICE_UNAVAILABLE, "Session service unavailable.");
        }
    };

    let path = normalize_path(req.uri().path());
    if path != req.uri().path() {
        match with_path(req.uri(), &path) {
            Ok(uri) => *req.uri_mut() = uri,
            Err(e) => {
                debug!(request_id = %req.request_id(), error = %e, "Unusable request path");
                return json_error(StatusCode::BAD_REQUEST, "Invalid request path.");
            }
        }
    }

    let decision = state.gate.decide(&path, &identity);
    metrics::record_decision(decision.label());

    match decision {
        Decision::Continue => {
            req.extensions_mut().insert::<SessionIdentity>(identity);
            next.run(req).await
        }
        Decision::RedirectTo(target) => {
            debug!(
                request_id = %req.request_id(),
                path = %path,
                target = %target,
                "Gate redirect"
            );
            redirect(&target)
        }
    }
}

/// `uri` with its path replaced, query kept.
fn with_path(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
