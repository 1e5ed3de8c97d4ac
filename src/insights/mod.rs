//! Project insights: paginated prompt query statistics.
//!
//! # Data Flow
//! ```text
//! GET /api/project/{id}/insights/queries?limit&page&from&to
//!     → project access check (http::middleware::project_access)
//!     → handlers.rs (parse pagination, date range)
//!     → store.rs (QueryStatsStore)
//!     → postgrest.rs (query_stats table via PostgREST)
//!     → 200 {queries} | 400 {error} | 404 {error}
//! ```

pub mod handlers;
pub mod postgrest;
pub mod store;
pub mod types;

pub use postgrest::PostgrestClient;
pub use store::{ProjectAccess, QueryStatsStore, StoreError};
pub use types::{DateRange, Pagination, QueryStat};
