//! Connected user identity.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ConnectionId;

/// Identity of a participant for the lifetime of one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable, client-supplied id
    pub user_id: String,

    pub display_name: String,

    /// Ephemeral id of the live connection
    pub connection_id: ConnectionId,
}

impl User {
    pub fn new(connection_id: ConnectionId, user_id: String, display_name: String) -> Self {
        Self {
            user_id,
            display_name,
            connection_id,
        }
    }
}
