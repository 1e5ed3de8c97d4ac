//! Path routing subsystem.
//!
//! # Data Flow
//! ```text
//! Pattern Compilation (at startup):
//!     default allow-list + configured extras
//!     → glob.rs (compile to segment lists)
//!     → allow_list.rs (freeze as immutable AllowList)
//!
//! Incoming Request (path):
//!     → normalize.rs (resolve dot segments, collapse slashes)
//!     → matcher.rs (evaluate exact / glob conditions)
//!     → Return: matched or not
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at startup, immutable at runtime
//! - No regex: segment backtracking only
//! - Deterministic: same input always yields the same answer

pub mod allow_list;
pub mod glob;
pub mod matcher;
pub mod normalize;

pub use allow_list::{AllowList, PUBLIC_NON_ROUTED_API_PATHS};
pub use glob::{matches_globs, GlobPattern, PatternError};
pub use matcher::{ExactPathMatcher, PathMatcher};
pub use normalize::normalize_path;
