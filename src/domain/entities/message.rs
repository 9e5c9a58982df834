//! Message entity.
//!
//! A message is created by a send, is immutable afterwards, and disappears
//! only when evicted from its channel's bounded history.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::services::FilterOutcome;
use crate::domain::value_objects::MessageId;

/// A moderated chat message as stored and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique, time-sortable id
    pub id: MessageId,

    /// Text after moderation. The only form ever broadcast.
    pub text: String,

    /// Text before moderation; empty unless the message was filtered
    pub original_text: String,

    pub sender_id: String,

    pub sender_name: String,

    pub channel_id: String,

    /// Unix timestamp in milliseconds
    pub timestamp: i64,

    pub is_filtered: bool,
}

impl Message {
    /// Build a message from raw input and the moderation outcome.
    pub fn new(
        id: MessageId,
        channel_id: &str,
        sender_id: String,
        sender_name: String,
        raw_text: String,
        outcome: FilterOutcome,
        timestamp: Option<i64>,
    ) -> Self {
        let FilterOutcome { text, is_filtered } = outcome;
        Self {
            id,
            text,
            original_text: if is_filtered { raw_text } else { String::new() },
            sender_id,
            sender_name,
            channel_id: channel_id.to_string(),
            timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()),
            is_filtered,
        }
    }
}
