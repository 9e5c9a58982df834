//! Channel Registry
//!
//! Owns every channel's membership and bounded history. Channels are fixed
//! at construction; there is no runtime creation or deletion.
//!
//! Each channel is guarded by its own `RwLock`. Mutations (join, leave,
//! send) hold the write lock for their whole duration, including the
//! caller-supplied publish closure of the `*_and_then` variants, so the
//! order in which messages are appended to a channel's history is the order
//! in which they are published. Queries take the read lock and observe a
//! consistent snapshot.
//!
//! Lock order is channel then presence. The presence tracker never calls
//! back into the registry.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;

use super::presence_tracker::PresenceTracker;
use crate::application::dto::{ChannelDetails, ChannelSummary, JoinOutcome};
use crate::domain::services::moderation;
use crate::domain::{ChannelDefinition, ConnectionId, Message};
use crate::shared::snowflake::SnowflakeGenerator;

/// Upper bound on messages retained per channel.
pub const MAX_HISTORY_CAPACITY: usize = 1000;

/// Messages retained per channel unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = MAX_HISTORY_CAPACITY;

/// Messages replayed to a connection when it joins.
pub const DEFAULT_JOIN_HISTORY_LIMIT: usize = 50;

/// History sizing for every channel in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    pub history_capacity: usize,
    pub join_history_limit: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            join_history_limit: DEFAULT_JOIN_HISTORY_LIMIT,
        }
    }
}

/// A message as submitted by a client, before moderation.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    /// Client timestamp in milliseconds; creation time is used when absent
    pub timestamp: Option<i64>,
}

/// State of a channel after a connection left it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub channel_id: String,
    /// Display names of the remaining members
    pub roster: Vec<String>,
    /// Remaining member connections
    pub members: Vec<ConnectionId>,
}

struct Channel {
    definition: ChannelDefinition,
    state: RwLock<ChannelState>,
}

#[derive(Default)]
struct ChannelState {
    /// Insertion-ordered, no duplicates
    members: Vec<ConnectionId>,
    history: VecDeque<Message>,
}

impl ChannelState {
    fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }
}

/// In-memory registry of channels.
pub struct ChannelRegistry {
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
    presence: Arc<PresenceTracker>,
    ids: SnowflakeGenerator,
    options: RegistryOptions,
}

impl ChannelRegistry {
    /// Build the registry from static channel definitions.
    ///
    /// Definitions keep their order for listing. A definition whose id was
    /// already seen is skipped. History capacity is clamped to
    /// `1..=MAX_HISTORY_CAPACITY`.
    pub fn new(
        definitions: Vec<ChannelDefinition>,
        presence: Arc<PresenceTracker>,
        options: RegistryOptions,
    ) -> Self {
        let mut channels = Vec::with_capacity(definitions.len());
        let mut index = HashMap::with_capacity(definitions.len());

        for definition in definitions {
            if index.contains_key(&definition.id) {
                tracing::warn!(channel_id = %definition.id, "Duplicate channel definition ignored");
                continue;
            }
            index.insert(definition.id.clone(), channels.len());
            channels.push(Channel {
                definition,
                state: RwLock::new(ChannelState::default()),
            });
        }

        let history_capacity = options.history_capacity.clamp(1, MAX_HISTORY_CAPACITY);
        if history_capacity != options.history_capacity {
            tracing::warn!(
                requested = options.history_capacity,
                applied = history_capacity,
                "History capacity out of range, clamped"
            );
        }
        let options = RegistryOptions {
            history_capacity,
            ..options
        };

        tracing::info!(channels = channels.len(), "Channel registry initialized");

        Self {
            channels,
            index,
            presence,
            ids: SnowflakeGenerator::new(),
            options,
        }
    }

    fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.index.get(channel_id).map(|&i| &self.channels[i])
    }

    fn resolve_roster(&self, members: &[ConnectionId]) -> Vec<String> {
        members
            .iter()
            .filter_map(|connection_id| self.presence.display_name(connection_id))
            .collect()
    }

    /// Add a connection to a channel.
    ///
    /// Returns `None` when the channel is unknown or the connection has no
    /// presence entry. Joining twice only refreshes the outcome.
    pub fn join(&self, channel_id: &str, connection_id: ConnectionId) -> Option<JoinOutcome> {
        self.join_and_then(channel_id, connection_id, |outcome, _| outcome)
    }

    /// Like [`join`](Self::join), running `publish` with the outcome and the
    /// current member list while the channel is still locked.
    pub fn join_and_then<R>(
        &self,
        channel_id: &str,
        connection_id: ConnectionId,
        publish: impl FnOnce(JoinOutcome, &[ConnectionId]) -> R,
    ) -> Option<R> {
        let channel = self.channel(channel_id)?;
        let mut state = channel.state.write();

        if !self.presence.is_registered(&connection_id) {
            tracing::debug!(
                channel_id = %channel_id,
                connection_id = %connection_id,
                "Join ignored for connection without presence"
            );
            return None;
        }

        if !state.contains(&connection_id) {
            state.members.push(connection_id);
        }

        let skip = state
            .history
            .len()
            .saturating_sub(self.options.join_history_limit);
        let outcome = JoinOutcome {
            roster: self.resolve_roster(&state.members),
            recent_history: state.history.iter().skip(skip).cloned().collect(),
        };

        tracing::debug!(
            channel_id = %channel_id,
            connection_id = %connection_id,
            members = state.members.len(),
            "Connection joined channel"
        );

        Some(publish(outcome, &state.members))
    }

    /// Remove a connection from every channel it belongs to.
    pub fn leave(&self, connection_id: &ConnectionId) -> Vec<LeaveOutcome> {
        let mut left = Vec::new();
        self.leave_and_then(connection_id, |outcome| left.push(outcome.clone()));
        left
    }

    /// Like [`leave`](Self::leave), calling `publish` for each channel left
    /// while that channel is still locked.
    pub fn leave_and_then(
        &self,
        connection_id: &ConnectionId,
        mut publish: impl FnMut(&LeaveOutcome),
    ) {
        for channel in &self.channels {
            let mut state = channel.state.write();
            let Some(position) = state.members.iter().position(|m| m == connection_id) else {
                continue;
            };
            state.members.remove(position);

            let outcome = LeaveOutcome {
                channel_id: channel.definition.id.clone(),
                roster: self.resolve_roster(&state.members),
                members: state.members.clone(),
            };

            tracing::debug!(
                channel_id = %outcome.channel_id,
                connection_id = %connection_id,
                members = outcome.members.len(),
                "Connection left channel"
            );

            publish(&outcome);
        }
    }

    /// Moderate and store a message.
    ///
    /// Returns `None` without touching any state when the channel is unknown.
    pub fn send(
        &self,
        channel_id: &str,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        text: impl Into<String>,
        timestamp: Option<i64>,
    ) -> Option<Message> {
        let draft = NewMessage {
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            text: text.into(),
            timestamp,
        };
        self.send_and_then(channel_id, draft, |message, _| message.clone())
    }

    /// Like [`send`](Self::send), running `publish` with the stored message
    /// and the member list before the channel is unlocked.
    pub fn send_and_then<R>(
        &self,
        channel_id: &str,
        draft: NewMessage,
        publish: impl FnOnce(&Message, &[ConnectionId]) -> R,
    ) -> Option<R> {
        let channel = self.channel(channel_id)?;
        let outcome = moderation::filter(&draft.text, &channel.definition.filter_rules);

        let mut state = channel.state.write();
        let message = Message::new(
            self.ids.generate(),
            channel_id,
            draft.sender_id,
            draft.sender_name,
            draft.text,
            outcome,
            draft.timestamp,
        );

        state.history.push_back(message);
        while state.history.len() > self.options.history_capacity {
            state.history.pop_front();
        }

        let message = state.history.back()?;

        tracing::debug!(
            channel_id = %channel_id,
            message_id = %message.id,
            is_filtered = message.is_filtered,
            "Message stored"
        );

        Some(publish(message, &state.members))
    }

    /// Display names of a channel's members in join order.
    pub fn roster_of(&self, channel_id: &str) -> Vec<String> {
        self.channel(channel_id)
            .map(|channel| self.resolve_roster(&channel.state.read().members))
            .unwrap_or_default()
    }

    /// Snapshot of a channel's member connections.
    pub fn members_of(&self, channel_id: &str) -> Option<Vec<ConnectionId>> {
        self.channel(channel_id)
            .map(|channel| channel.state.read().members.clone())
    }

    /// Snapshot of a channel's stored history, oldest first.
    pub fn history_of(&self, channel_id: &str) -> Option<Vec<Message>> {
        self.channel(channel_id)
            .map(|channel| channel.state.read().history.iter().cloned().collect())
    }

    /// All channels in configuration order.
    pub fn list_channels(&self) -> Vec<ChannelSummary> {
        self.channels
            .iter()
            .map(|channel| ChannelSummary {
                id: channel.definition.id.clone(),
                name: channel.definition.name.clone(),
                description: channel.definition.description.clone(),
                member_count: channel.state.read().members.len(),
            })
            .collect()
    }

    /// Full description of one channel, or `None` if it does not exist.
    pub fn describe(&self, channel_id: &str) -> Option<ChannelDetails> {
        let channel = self.channel(channel_id)?;
        let state = channel.state.read();
        Some(ChannelDetails {
            id: channel.definition.id.clone(),
            name: channel.definition.name.clone(),
            description: channel.definition.description.clone(),
            filter_rules: channel.definition.filter_rules.clone(),
            member_count: state.members.len(),
            message_count: state.history.len(),
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
