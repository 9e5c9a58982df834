//! # Domain Services
//!
//! Domain services encapsulate business logic that doesn't naturally
//! belong to a single entity.
//!
//! ## Services
//!
//! - **Moderation**: Message text filtering pipeline

pub mod moderation;

pub use moderation::{filter, FilterOutcome};
