//! Time-ordered message identifiers.
//!
//! ## Structure
//!
//! ```text
//! 64                                            12          0
//! +----------------------------------------------+-----------+
//! |        milliseconds since RELAY_EPOCH         |  sequence |
//! |                  (52 bits)                    |  (12 bits)|
//! +----------------------------------------------+-----------+
//! ```
//!
//! Ids are serialized as decimal strings so JavaScript clients never lose
//! precision.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Relay epoch: 2024-01-01T00:00:00Z in milliseconds
pub const RELAY_EPOCH: u64 = 1704067200000;

/// Bits reserved for the per-millisecond sequence.
pub const SEQUENCE_BITS: u32 = 12;

/// Largest sequence value that fits in a single millisecond.
pub const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

/// A unique, time-sortable message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// Build an id from a millisecond offset past `RELAY_EPOCH` and a sequence.
    pub fn from_parts(offset_ms: u64, sequence: u64) -> Self {
        Self((offset_ms << SEQUENCE_BITS) | (sequence & MAX_SEQUENCE))
    }

    /// Unix timestamp in milliseconds embedded in this id.
    pub fn timestamp(&self) -> u64 {
        (self.0 >> SEQUENCE_BITS) + RELAY_EPOCH
    }

    /// Sequence number within the millisecond.
    pub fn sequence(&self) -> u64 {
        self.0 & MAX_SEQUENCE
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let id = MessageId::from_parts(1_000, 7);
        assert_eq!(id.timestamp(), RELAY_EPOCH + 1_000);
        assert_eq!(id.sequence(), 7);
    }

    #[test]
    fn test_ordering_follows_time_then_sequence() {
        let a = MessageId::from_parts(10, MAX_SEQUENCE);
        let b = MessageId::from_parts(11, 0);
        assert!(a < b);
    }

    #[test]
    fn test_serializes_as_string() {
        let id = MessageId::from_parts(5, 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_u64()));
    }
}
