//! WebSocket Session Management

use std::time::{Duration, Instant};

/// Per-connection bookkeeping kept by the socket task
#[derive(Debug)]
pub struct SessionState {
    pub user_id: String,
    pub connected_at: Instant,
    pub frames_received: u64,
    pub frames_rejected: u64,
}

impl SessionState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            connected_at: Instant::now(),
            frames_received: 0,
            frames_rejected: 0,
        }
    }

    /// Count an inbound frame and whether it was accepted
    pub fn record_frame(&mut self, accepted: bool) {
        self.frames_received += 1;
        if !accepted {
            self.frames_rejected += 1;
        }
    }

    pub fn uptime(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
