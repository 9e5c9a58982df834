//! Session Dispatcher
//!
//! Translates connection events into registry and presence operations and
//! emits the resulting outbound events. All channel fan-out happens inside
//! the registry's `*_and_then` closures, while the channel is locked, so
//! members observe messages in the order they were stored.

use std::sync::Arc;

use super::messages::{
    ClientEvent, JoinChannelPayload, MessageFilteredPayload, SendMessagePayload, ServerEvent,
    SessionError, StopTypingPayload, StoppedTypingPayload, TypingPayload, UserNotice,
};
use crate::application::services::{ChannelRegistry, NewMessage, PresenceTracker};
use crate::domain::ConnectionId;
use crate::infrastructure::metrics;

/// Destination for outbound events.
///
/// Delivery is fire-and-forget; implementations must not block.
pub trait EventSink: Send + Sync {
    /// Queue an event for a single connection
    fn deliver(&self, connection_id: &ConnectionId, event: ServerEvent);

    /// Queue the same event for every listed connection
    fn deliver_all(&self, connections: &[ConnectionId], event: &ServerEvent) {
        for connection_id in connections {
            self.deliver(connection_id, event.clone());
        }
    }

    /// Queue an event for every listed connection except `skip`
    fn deliver_except(&self, connections: &[ConnectionId], skip: &ConnectionId, event: &ServerEvent) {
        for connection_id in connections.iter().filter(|c| *c != skip) {
            self.deliver(connection_id, event.clone());
        }
    }
}

/// Everything that can happen on a connection
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Handshake completed with the client-supplied identity
    Connect { user_id: String, user_name: String },
    JoinChannel(JoinChannelPayload),
    SendMessage(SendMessagePayload),
    Typing(TypingPayload),
    StopTyping(StopTypingPayload),
    /// Socket closed
    Disconnect,
}

impl From<ClientEvent> for SessionEvent {
    fn from(event: ClientEvent) -> Self {
        match event {
            ClientEvent::JoinChannel(p) => SessionEvent::JoinChannel(p),
            ClientEvent::SendMessage(p) => SessionEvent::SendMessage(p),
            ClientEvent::Typing(p) => SessionEvent::Typing(p),
            ClientEvent::StopTyping(p) => SessionEvent::StopTyping(p),
        }
    }
}

/// Shared event handler used by every connection task
pub struct Dispatcher {
    registry: Arc<ChannelRegistry>,
    presence: Arc<PresenceTracker>,
    sink: Arc<dyn EventSink>,
    max_message_length: usize,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        presence: Arc<PresenceTracker>,
        sink: Arc<dyn EventSink>,
        max_message_length: usize,
    ) -> Self {
        Self {
            registry,
            presence,
            sink,
            max_message_length,
        }
    }

    /// Decode a text frame and dispatch it.
    pub fn handle_frame(&self, connection_id: ConnectionId, text: &str) -> Result<(), SessionError> {
        let event = ClientEvent::decode(text, self.max_message_length)?;
        tracing::trace!(
            connection_id = %connection_id,
            event = event.event_name(),
            "Frame received"
        );
        self.dispatch(connection_id, event.into());
        Ok(())
    }

    /// Apply one event on behalf of a connection.
    pub fn dispatch(&self, connection_id: ConnectionId, event: SessionEvent) {
        match event {
            SessionEvent::Connect { user_id, user_name } => {
                self.presence.register(connection_id, user_id, user_name);
            }
            SessionEvent::JoinChannel(payload) => self.on_join(connection_id, payload),
            SessionEvent::SendMessage(payload) => self.on_send(connection_id, payload),
            SessionEvent::Typing(payload) => self.on_typing(connection_id, payload),
            SessionEvent::StopTyping(payload) => self.on_stop_typing(connection_id, payload),
            SessionEvent::Disconnect => self.on_disconnect(connection_id),
        }
    }

    fn on_join(&self, connection_id: ConnectionId, payload: JoinChannelPayload) {
        let Some(user) = self.presence.lookup(&connection_id) else {
            tracing::debug!(connection_id = %connection_id, "Join from unidentified connection");
            return;
        };
        let notice = ServerEvent::UserJoined(UserNotice {
            user_id: if payload.user_id.is_empty() {
                user.user_id
            } else {
                payload.user_id
            },
            user_name: user.display_name,
        });

        let joined = self
            .registry
            .join_and_then(&payload.channel_id, connection_id, |outcome, members| {
                self.sink
                    .deliver_all(members, &ServerEvent::OnlineUsers(outcome.roster));
                self.sink.deliver_except(members, &connection_id, &notice);
                self.sink.deliver(
                    &connection_id,
                    ServerEvent::MessageHistory(outcome.recent_history),
                );
            });

        if joined.is_none() {
            tracing::debug!(
                connection_id = %connection_id,
                channel_id = %payload.channel_id,
                "Join dropped: unknown channel"
            );
        }
    }

    fn on_send(&self, connection_id: ConnectionId, payload: SendMessagePayload) {
        let channel_id = payload.channel_id;
        let draft = NewMessage {
            sender_id: payload.sender_id,
            sender_name: payload.sender_name,
            text: payload.text,
            timestamp: payload.timestamp,
        };

        let sent = self
            .registry
            .send_and_then(&channel_id, draft, |message, members| {
                self.sink
                    .deliver_all(members, &ServerEvent::Message(message.clone()));
                if message.is_filtered {
                    let filtered = ServerEvent::MessageFiltered(MessageFilteredPayload {
                        message_id: message.id,
                        filtered_text: message.text.clone(),
                    });
                    self.sink.deliver_all(members, &filtered);
                }
                metrics::record_message(&channel_id, message.is_filtered);
            });

        if sent.is_none() {
            tracing::debug!(
                connection_id = %connection_id,
                channel_id = %channel_id,
                "Message dropped: unknown channel"
            );
        }
    }

    fn on_typing(&self, connection_id: ConnectionId, payload: TypingPayload) {
        let Some(members) = self.registry.members_of(&payload.channel_id) else {
            return;
        };
        let event = ServerEvent::UserTyping(UserNotice {
            user_id: payload.user_id,
            user_name: payload.user_name,
        });
        self.sink.deliver_except(&members, &connection_id, &event);
    }

    fn on_stop_typing(&self, connection_id: ConnectionId, payload: StopTypingPayload) {
        let Some(members) = self.registry.members_of(&payload.channel_id) else {
            return;
        };
        let event = ServerEvent::UserStoppedTyping(StoppedTypingPayload {
            user_id: payload.user_id,
        });
        self.sink.deliver_except(&members, &connection_id, &event);
    }

    fn on_disconnect(&self, connection_id: ConnectionId) {
        // Captured before unregistering so the notice carries the old identity
        let user = self.presence.lookup(&connection_id);

        self.registry.leave_and_then(&connection_id, |outcome| {
            self.sink.deliver_all(
                &outcome.members,
                &ServerEvent::OnlineUsers(outcome.roster.clone()),
            );
            if let Some(user) = &user {
                let notice = ServerEvent::UserLeft(UserNotice {
                    user_id: user.user_id.clone(),
                    user_name: user.display_name.clone(),
                });
                self.sink.deliver_all(&outcome.members, &notice);
            }
        });

        self.presence.unregister(&connection_id);
    }
}
