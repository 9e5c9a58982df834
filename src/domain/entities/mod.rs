//! # Domain Entities
//!
//! Core domain entities of the relay.
//!
//! - **ChannelDefinition**: A configured channel and its moderation rules
//! - **Message**: A moderated text message sent in a channel
//! - **User**: Identity bound to a live connection

mod channel;
mod message;
mod user;

pub use channel::{default_channels, ChannelDefinition, FilterRule, RuleAction, RuleKind};
pub use message::Message;
pub use user::User;
