//! Response DTOs
//!
//! Data structures returned by the channel query surface.

use serde::Serialize;

use crate::domain::{FilterRule, Message};

/// Channel list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "userCount")]
    pub member_count: usize,
}

/// Full channel description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDetails {
    pub id: String,
    pub name: String,
    pub description: String,
    pub filter_rules: Vec<FilterRule>,
    #[serde(rename = "userCount")]
    pub member_count: usize,
    pub message_count: usize,
}

/// What a connection receives when it joins a channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Display names of every member, joiner included
    pub roster: Vec<String>,
    /// Most recent messages, oldest first
    pub recent_history: Vec<Message>,
}
