//! Request middleware.
//!
//! ```text
//! every request   → access_gate.rs    (redirect or continue)
//! /api/project/*  → project_access.rs (401 / 403 or continue)
//! ```

pub mod access_gate;
pub mod project_access;

pub use access_gate::access_gate_middleware;
pub use project_access::project_access_middleware;
