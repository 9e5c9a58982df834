//! Infrastructure Layer
//!
//! Process-level concerns that sit outside the chat domain, currently the
//! Prometheus metrics registry.

pub mod metrics;
