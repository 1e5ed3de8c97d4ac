//! Forwarding of gate-approved requests to the application server.
//!
//! # Responsibilities
//! - Rewrite the request URI to the upstream authority
//! - Stream request and response bodies unchanged
//! - Map upstream failures to 502
//!
//! # Design Decisions
//! - No retries: the gate does not know which requests are idempotent
//! - No upstream configured means 404 for everything not routed locally

use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::RequestIdExt;
use crate::http::response::json_error;
use crate::http::server::AppState;

/// HTTP client bound to one upstream address.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl Upstream {
    pub fn new(address: &str, connect_timeout: Duration) -> Result<Self, axum::http::uri::InvalidUri> {
        let authority = Authority::from_str(address)?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, authority })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    fn upstream_uri(&self, uri: &Uri) -> Uri {
        let mut parts = uri.clone().into_parts();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Uri::from_parts(parts).unwrap_or_else(|_| uri.clone())
    }
}

/// Fallback handler: forward to the upstream, or 404 when there is none.
pub async fn forward_handler(State(state): State<AppState>, request: Request) -> Response {
    let Some(upstream) = state.upstream.as_ref() else {
        return json_error(StatusCode::NOT_FOUND, "Not found");
    };

    let request_id = request.request_id().to_string();
    let (mut parts, body) = request.into_parts();
    parts.uri = upstream.upstream_uri(&parts.uri);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        uri = %parts.uri,
        "Forwarding request"
    );

    match upstream.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            json_error(StatusCode::BAD_GATEWAY, "Upstream request failed")
        }
    }
}
