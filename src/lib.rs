//! Authentication gate and project insights API for the web app.

pub mod config;
pub mod gate;
pub mod http;
pub mod insights;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::schema::GateConfig;
pub use gate::{AccessGate, Decision, SessionIdentity};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::PUBLIC_NON_ROUTED_API_PATHS;
