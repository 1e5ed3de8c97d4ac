//! Path matching logic.
//!
//! # Responsibilities
//! - Match a request path exactly (literal pages)
//! - Match a request path against a compiled glob
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Matchers see the path only; query strings are stripped by the caller

use crate::routing::glob::GlobPattern;

/// Trait for matching request paths against conditions.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches a fixed set of paths by string equality.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    paths: Vec<String>,
}

impl ExactPathMatcher {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl PathMatcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

impl PathMatcher for GlobPattern {
    fn matches(&self, path: &str) -> bool {
        GlobPattern::matches(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactPathMatcher::new(["/login", "/signup"]);

        assert!(matcher.matches("/login"));
        assert!(matcher.matches("/signup"));
        assert!(!matcher.matches("/login/email"));
        assert!(!matcher.matches("/LOGIN"));
    }

    #[test]
    fn test_glob_through_trait_object() {
        let matcher: Box<dyn PathMatcher> = Box::new(GlobPattern::compile("/legal/**/*").unwrap());

        assert!(matcher.matches("/legal/terms"));
        assert!(!matcher.matches("/legal"));
    }
}
