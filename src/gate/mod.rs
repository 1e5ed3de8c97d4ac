//! Access gate.
//!
//! Decides, per request path and session, whether the request passes
//! through or is redirected.
//!
//! # Rules
//! ```text
//! no session  && path not in allow-list (glob)  → redirect /login
//! session     && path is /login or /signup (==) → redirect /
//! otherwise                                     → continue
//! ```
//!
//! The second rule compares literally and ignores the allow-list.

use serde::Serialize;

use crate::routing::{AllowList, ExactPathMatcher, PathMatcher};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated users are sent from entry pages.
pub const HOME_PATH: &str = "/";
/// Entry-only pages that a signed-in user is bounced away from.
pub const ENTRY_PATHS: [&str; 2] = ["/login", "/signup"];

/// Result of a session lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionIdentity {
    /// Authenticated user with an opaque id.
    Present { user_id: String },
    #[default]
    Absent,
}

impl SessionIdentity {
    pub fn present(user_id: impl Into<String>) -> Self {
        Self::Present {
            user_id: user_id.into(),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Present { user_id } => Some(user_id),
            Self::Absent => None,
        }
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum Decision {
    Continue,
    RedirectTo(String),
}

impl Decision {
    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Continue => "continue",
            Decision::RedirectTo(target) if target == LOGIN_PATH => "redirect_login",
            Decision::RedirectTo(_) => "redirect_home",
        }
    }
}

/// Path-based access gate. Immutable once built.
#[derive(Debug, Clone)]
pub struct AccessGate {
    allow_list: AllowList,
    entry_pages: ExactPathMatcher,
}

impl AccessGate {
    pub fn new(allow_list: AllowList) -> Self {
        Self {
            allow_list,
            entry_pages: ExactPathMatcher::new(ENTRY_PATHS),
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Map a request path and session to a decision.
    pub fn decide(&self, path: &str, identity: &SessionIdentity) -> Decision {
        let signed_in = identity.is_present();

        if !signed_in && !self.allow_list.matches(path) {
            Decision::RedirectTo(LOGIN_PATH.to_string())
        } else if signed_in && self.entry_pages.matches(path) {
            Decision::RedirectTo(HOME_PATH.to_string())
        } else {
            Decision::Continue
        }
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(AllowList::default())
    }
}
