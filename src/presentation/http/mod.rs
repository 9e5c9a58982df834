//! HTTP Surface
//!
//! Channel discovery, health checks and metrics.

pub mod handlers;
pub mod routes;

pub use routes::create_router;
