//! Session lookup subsystem.
//!
//! # Data Flow
//! ```text
//! Request headers (Authorization / Cookie)
//!     → token.rs (extract access token)
//!     → supabase.rs (validate token against the auth service)
//!     → SessionIdentity (present / absent)
//! ```
//!
//! # Design Decisions
//! - No token means absent, without any network call
//! - A rejected token (401/403) means absent
//! - Anything else is an error; the gate is not consulted on errors

pub mod supabase;
pub mod token;

use async_trait::async_trait;
use axum::http::HeaderMap;
use thiserror::Error;

use crate::gate::SessionIdentity;

pub use supabase::SupabaseSessionProvider;

/// Errors from the session service.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Request to the auth service failed.
    #[error("auth service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Auth service answered with a status we do not interpret.
    #[error("auth service returned {0}")]
    UnexpectedStatus(u16),
}

/// Resolves the session identity of a request.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn identity(&self, headers: &HeaderMap) -> Result<SessionIdentity, SessionError>;
}
