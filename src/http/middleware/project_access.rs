//! Project access middleware.
//! Only members of the project's team reach the wrapped handlers.
//! Every response of the wrapped routes, rejections included, is counted in
//! the insights request metrics here.

use std::time::Instant;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::gate::SessionIdentity;
use crate::http::request::RequestIdExt;
use crate::http::response::json_error;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn project_access_middleware(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = authorize(&state, &project_id, req, next).await;
    metrics::record_insights_request(response.status().as_u16(), start);
    response
}

async fn authorize(state: &AppState, project_id: &str, req: Request, next: Next) -> Response {
    // The gate stores the identity it resolved; look it up ourselves when the
    // gate is disabled.
    let cached = req.extensions().get::<SessionIdentity>().cloned();
    let identity = match cached {
        Some(identity) => identity,
        None => match state.sessions.identity(req.headers()).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(request_id = %req.request_id(), error = %e, "Session lookup failed");
                return json_error(StatusCode::SERVICE_UNAVAILABLE, "Session service unavailable.");
            }
        },
    };

    let Some(user_id) = identity.user_id() else {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "Please sign in to access this project.",
        );
    };

    match state.projects.has_access(user_id, project_id).await {
        Ok(true) => next.run(req).await,
        Ok(false) => json_error(StatusCode::FORBIDDEN, "Forbidden"),
        Err(e) => {
            warn!(
                request_id = %req.request_id(),
                project_id = %project_id,
                error = %e,
                "Project access check failed"
            );
            json_error(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}
