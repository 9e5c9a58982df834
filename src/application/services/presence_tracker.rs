//! Presence Tracker
//!
//! Live mapping from connection to user identity.

use dashmap::DashMap;

use crate::domain::{ConnectionId, User};

/// Concurrent presence table keyed by connection id.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    users: DashMap<ConnectionId, User>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identity behind a freshly connected socket.
    pub fn register(
        &self,
        connection_id: ConnectionId,
        user_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> User {
        let user = User::new(connection_id, user_id.into(), display_name.into());
        self.users.insert(connection_id, user.clone());

        tracing::debug!(
            connection_id = %connection_id,
            user_id = %user.user_id,
            "Presence registered"
        );

        user
    }

    /// Drop a connection's identity, returning what was stored.
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<User> {
        let removed = self.users.remove(connection_id).map(|(_, user)| user);
        if let Some(user) = &removed {
            tracing::debug!(
                connection_id = %connection_id,
                user_id = %user.user_id,
                "Presence unregistered"
            );
        }
        removed
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<User> {
        self.users.get(connection_id).map(|entry| entry.value().clone())
    }

    /// Display name for a connection, if it is still registered.
    pub fn display_name(&self, connection_id: &ConnectionId) -> Option<String> {
        self.users
            .get(connection_id)
            .map(|entry| entry.display_name.clone())
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.users.contains_key(connection_id)
    }

    /// Number of live connections with a known identity.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
