//! Public (unauthenticated) path allow-list.

use crate::routing::glob::{GlobPattern, PatternError};
use crate::routing::matcher::PathMatcher;

/// API paths that are reachable without a session and bypass page routing.
pub const PUBLIC_NON_ROUTED_API_PATHS: &[&str] = &[
    "/api/oauth",
    "/api/subscriptions/webhook",
    "/api/support/contact",
];

/// Pages reachable without a session.
pub const PUBLIC_PAGE_PATHS: &[&str] = &[
    "/",
    "/home",
    "/docs",
    "/blog",
    "/blog/**/*",
    "/login",
    "/login/email",
    "/login/confirm",
    "/login/accept-invite",
    "/login/confirm-signup",
    "/signup",
    "/resources/**/*",
    "/legal/**/*",
    "/s/*",
    "/embed/*",
];

/// Every pattern of the default allow-list, pages first.
pub fn default_unauthed_paths() -> impl Iterator<Item = &'static str> {
    PUBLIC_PAGE_PATHS
        .iter()
        .chain(PUBLIC_NON_ROUTED_API_PATHS.iter())
        .copied()
}

/// Compiled, immutable set of public path patterns.
#[derive(Debug, Clone)]
pub struct AllowList {
    patterns: Vec<GlobPattern>,
}

impl AllowList {
    /// Compile the given patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| GlobPattern::compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The built-in allow-list extended with additional patterns.
    pub fn with_extra<I, S>(extra: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for p in extra {
            list.patterns.push(GlobPattern::compile(p.as_ref())?);
        }
        Ok(list)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(GlobPattern::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        let patterns = default_unauthed_paths()
            .filter_map(|p| GlobPattern::compile(p).ok())
            .collect();
        Self { patterns }
    }
}

impl PathMatcher for AllowList {
    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_compiles_every_pattern() {
        let list = AllowList::default();
        assert_eq!(
            list.len(),
            PUBLIC_PAGE_PATHS.len() + PUBLIC_NON_ROUTED_API_PATHS.len()
        );
    }

    #[test]
    fn test_default_list_contains_public_api_paths() {
        let list = AllowList::default();
        for path in PUBLIC_NON_ROUTED_API_PATHS {
            assert!(list.patterns().any(|p| p == *path));
            assert!(list.matches(path));
        }
    }

    #[test]
    fn test_default_list_matching() {
        let list = AllowList::default();
        assert!(list.matches("/"));
        assert!(list.matches("/blog"));
        assert!(list.matches("/blog/2024/post"));
        assert!(list.matches("/legal/privacy"));
        assert!(list.matches("/s/abc"));
        assert!(list.matches("/embed/xyz"));

        assert!(!list.matches("/settings"));
        assert!(!list.matches("/s/abc/def"));
        assert!(!list.matches("/legal"));
        assert!(!list.matches("/api/project/1/insights/queries"));
    }

    #[test]
    fn test_with_extra() {
        let list = AllowList::with_extra(["/status"]).unwrap();
        assert!(list.matches("/status"));
        assert!(list.matches("/login"));

        assert!(AllowList::with_extra(["status"]).is_err());
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let list = AllowList::new(Vec::<String>::new()).unwrap();
        assert!(list.is_empty());
        assert!(!list.matches("/"));
    }
}
