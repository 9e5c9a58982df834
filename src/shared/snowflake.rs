//! Snowflake ID Generator
//!
//! Process-wide generator for time-ordered, unique message ids.

use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::value_objects::{MessageId, MAX_SEQUENCE, RELAY_EPOCH};

/// Snowflake ID generator
///
/// Ids are strictly increasing. When more than `MAX_SEQUENCE + 1` ids are
/// requested within one millisecond, or the wall clock steps backwards, the
/// generator borrows from the next logical millisecond instead of waiting.
pub struct SnowflakeGenerator {
    state: Mutex<GeneratorState>,
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_offset_ms: u64,
    sequence: u64,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> MessageId {
        let now = current_offset_ms();
        let mut state = self.state.lock();

        if now > state.last_offset_ms {
            state.last_offset_ms = now;
            state.sequence = 0;
        } else if state.sequence < MAX_SEQUENCE {
            state.sequence += 1;
        } else {
            state.last_offset_ms += 1;
            state.sequence = 0;
        }

        MessageId::from_parts(state.last_offset_ms, state.sequence)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds elapsed since `RELAY_EPOCH`
fn current_offset_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(RELAY_EPOCH)
        .saturating_sub(RELAY_EPOCH)
}
