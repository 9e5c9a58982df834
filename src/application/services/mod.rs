//! Application Services
//!
//! Shared, in-memory state services used by every connection.
//!
//! ## Available Services
//!
//! - **ChannelRegistry**: Channels, membership, bounded history, moderation on send
//! - **PresenceTracker**: Connection to user identity mapping

pub mod channel_registry;
pub mod presence_tracker;

pub use channel_registry::{
    ChannelRegistry, LeaveOutcome, NewMessage, RegistryOptions, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_JOIN_HISTORY_LIMIT, MAX_HISTORY_CAPACITY,
};
pub use presence_tracker::PresenceTracker;
