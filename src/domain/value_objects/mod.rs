//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **ConnectionId**: Per-connection random identifier
//! - **MessageId**: Time-sortable unique message id

mod connection_id;
mod message_id;

pub use connection_id::*;
pub use message_id::*;
