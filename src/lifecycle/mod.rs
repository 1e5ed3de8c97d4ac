//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → servers stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every server task
//! - Tests trigger shutdown directly instead of sending signals

pub mod shutdown;

pub use shutdown::{shutdown_signal, Shutdown};
