//! WebSocket Gateway
//!
//! Routes outbound events to live connections.

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::dispatcher::EventSink;
use super::messages::ServerEvent;
use crate::domain::ConnectionId;

/// Outbound half of every connected socket, keyed by connection id.
pub struct Gateway {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register the outbound queue of a newly upgraded socket
    pub fn register(&self, connection_id: ConnectionId, sender: mpsc::UnboundedSender<ServerEvent>) {
        self.connections.insert(connection_id, sender);
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Forget a connection; later events addressed to it are dropped
    pub fn unregister(&self, connection_id: &ConnectionId) {
        if self.connections.remove(connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    /// Queue an event for one connection. Returns false if it is gone.
    pub fn send_to(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        match self.connections.get(connection_id) {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Get connection count
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for Gateway {
    fn deliver(&self, connection_id: &ConnectionId, event: ServerEvent) {
        if !self.send_to(connection_id, event) {
            tracing::trace!(connection_id = %connection_id, "Dropped event for closed connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_to_registered_connection() {
        let gateway = Gateway::new();
        let conn = ConnectionId::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.register(conn, tx);

        assert!(gateway.send_to(&conn, ServerEvent::OnlineUsers(vec!["A".into()])));
        assert_eq!(
            rx.try_recv().unwrap(),
            ServerEvent::OnlineUsers(vec!["A".into()])
        );
        assert_eq!(gateway.connection_count(), 1);
    }

    #[test]
    fn test_send_after_unregister_is_dropped() {
        let gateway = Gateway::new();
        let conn = ConnectionId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        gateway.register(conn, tx);
        gateway.unregister(&conn);

        assert!(!gateway.send_to(&conn, ServerEvent::OnlineUsers(Vec::new())));
        assert_eq!(gateway.connection_count(), 0);
    }

    #[test]
    fn test_deliver_all_fans_out() {
        let gateway = Gateway::new();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        gateway.register(a, tx_a);
        gateway.register(b, tx_b);

        let event = ServerEvent::OnlineUsers(vec!["A".into(), "B".into()]);
        gateway.deliver_all(&[a, b], &event);

        assert_eq!(rx_a.try_recv().unwrap(), event);
        assert_eq!(rx_b.try_recv().unwrap(), event);
    }
}
