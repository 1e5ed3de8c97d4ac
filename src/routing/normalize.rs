//! Request path normalization.
//!
//! Glob matching works on segments, so `..` or an empty segment would be
//! absorbed by `**` and `*`. The gate and the upstream must see the same
//! path, which is the one the upstream would resolve to.
//!
//! # Rules
//! - `\` is a separator, as browsers and URL parsers treat it
//! - Empty segments collapse (`//` becomes `/`)
//! - `.` and its percent-encoded forms are dropped
//! - `..` and its percent-encoded forms remove the previous segment;
//!   climbing above the root stays at the root
//! - No trailing slash, except for `/` itself

/// Normalize a request path. The result always starts with `/`.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        if segment.is_empty() || is_single_dot(segment) {
            continue;
        }
        if is_double_dot(segment) {
            segments.pop();
            continue;
        }
        segments.push(segment);
    }

    let mut normalized = String::with_capacity(path.len());
    for segment in &segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    matches!(segment, "..")
        || segment.eq_ignore_ascii_case(".%2e")
        || segment.eq_ignore_ascii_case("%2e.")
        || segment.eq_ignore_ascii_case("%2e%2e")
}
