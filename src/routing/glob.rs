//! Segment-based glob patterns for request paths.
//!
//! # Syntax
//! - `*` matches exactly one non-empty path segment
//! - `**` matches zero or more path segments
//! - anything else is a literal segment (case-sensitive)
//!
//! # Design Decisions
//! - Patterns compiled once, matched many times
//! - Whole-path match: no prefix or partial matches
//! - Malformed paths never match (no error path at match time)

use thiserror::Error;

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern {0:?} must start with '/'")]
    MissingLeadingSlash(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`
    Any,
    /// `**`
    AnyDepth,
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    source: String,
    segments: Vec<Segment>,
}

impl GlobPattern {
    /// Compile a pattern such as `/blog/**/*`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;

        let segments = rest
            .split('/')
            .map(|s| match s {
                "*" => Segment::Any,
                "**" => Segment::AnyDepth,
                lit => Segment::Literal(lit.to_string()),
            })
            .collect();

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the whole path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix('/') {
            Some(rest) => {
                let parts: Vec<&str> = rest.split('/').collect();
                match_segments(&self.segments, &parts)
            }
            None => false,
        }
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, tail)) => {
            // Try every split point, shortest span first.
            (0..=path.len()).any(|skip| match_segments(tail, &path[skip..]))
        }
        Some((head, tail)) => match path.split_first() {
            None => false,
            Some((part, rest)) => {
                let ok = match head {
                    Segment::Literal(lit) => lit == part,
                    _ => !part.is_empty(),
                };
                ok && match_segments(tail, rest)
            }
        },
    }
}

/// Returns true if any of the patterns matches the path.
///
/// Patterns that fail to compile are treated as non-matching.
pub fn matches_globs<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|p| {
        GlobPattern::compile(p.as_ref())
            .map(|g| g.matches(path))
            .unwrap_or(false)
    })
}
