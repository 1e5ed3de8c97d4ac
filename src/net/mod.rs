//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! config.listener.tls
//!     → tls.rs (load PEM certificate and key)
//!     → RustlsConfig handed to the HTTPS server
//! ```
//!
//! # Design Decisions
//! - TLS is optional; plain TCP when no certificate is configured
//! - Missing files are reported before any socket is bound

pub mod tls;
