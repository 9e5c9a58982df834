//! WebSocket Message Types
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! Inbound and outbound event names are camelCase to stay compatible with
//! existing browser clients.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{Message, MessageId};
use crate::shared::validation::field_errors;

/// Errors raised while decoding an inbound frame
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Message exceeds {max} characters")]
    MessageTooLong { max: usize },
}

/// `joinChannel` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinChannelPayload {
    #[validate(length(min = 1, message = "channelId must not be empty"))]
    pub channel_id: String,

    #[serde(default)]
    pub user_id: String,
}

/// `sendMessage` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    /// May be empty; length is bounded only by the socket message size
    #[serde(default)]
    pub text: String,

    #[validate(length(min = 1, message = "channelId must not be empty"))]
    pub channel_id: String,

    #[serde(default)]
    pub sender_id: String,

    #[serde(default)]
    pub sender_name: String,

    /// Client clock in milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// `typing` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    #[validate(length(min = 1, message = "channelId must not be empty"))]
    pub channel_id: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub user_name: String,
}

/// `stopTyping` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StopTypingPayload {
    #[validate(length(min = 1, message = "channelId must not be empty"))]
    pub channel_id: String,

    #[serde(default)]
    pub user_id: String,
}

/// Events a client may send over an open socket
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinChannel(JoinChannelPayload),
    SendMessage(SendMessagePayload),
    Typing(TypingPayload),
    StopTyping(StopTypingPayload),
}

impl ClientEvent {
    /// Parse and validate a text frame.
    pub fn decode(text: &str, max_message_length: usize) -> Result<Self, SessionError> {
        let event: ClientEvent = serde_json::from_str(text)?;

        let validation = match &event {
            ClientEvent::JoinChannel(p) => p.validate(),
            ClientEvent::SendMessage(p) => p.validate(),
            ClientEvent::Typing(p) => p.validate(),
            ClientEvent::StopTyping(p) => p.validate(),
        };
        if let Err(errors) = validation {
            let message = field_errors(&errors)
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SessionError::InvalidPayload(message));
        }

        if let ClientEvent::SendMessage(p) = &event {
            if p.text.chars().count() > max_message_length {
                return Err(SessionError::MessageTooLong {
                    max: max_message_length,
                });
            }
        }

        Ok(event)
    }

    /// Get the event name as it appears on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientEvent::JoinChannel(_) => "joinChannel",
            ClientEvent::SendMessage(_) => "sendMessage",
            ClientEvent::Typing(_) => "typing",
            ClientEvent::StopTyping(_) => "stopTyping",
        }
    }
}

/// Identity carried by join/leave/typing notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotice {
    pub user_id: String,
    pub user_name: String,
}

/// `messageFiltered` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilteredPayload {
    pub message_id: MessageId,
    pub filtered_text: String,
}

/// `userStoppedTyping` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppedTypingPayload {
    pub user_id: String,
}

/// Events pushed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    OnlineUsers(Vec<String>),
    UserJoined(UserNotice),
    UserLeft(UserNotice),
    MessageHistory(Vec<Message>),
    Message(Message),
    MessageFiltered(MessageFilteredPayload),
    UserTyping(UserNotice),
    UserStoppedTyping(StoppedTypingPayload),
}

impl ServerEvent {
    /// Get the event name for dispatch
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerEvent::OnlineUsers(_) => "onlineUsers",
            ServerEvent::UserJoined(_) => "userJoined",
            ServerEvent::UserLeft(_) => "userLeft",
            ServerEvent::MessageHistory(_) => "messageHistory",
            ServerEvent::Message(_) => "message",
            ServerEvent::MessageFiltered(_) => "messageFiltered",
            ServerEvent::UserTyping(_) => "userTyping",
            ServerEvent::UserStoppedTyping(_) => "userStoppedTyping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_send_message() {
        let frame = json!({
            "event": "sendMessage",
            "data": {
                "text": "hello",
                "channelId": "genel-sohbet",
                "senderId": "u1",
                "senderName": "Alice",
                "timestamp": 1700000000000_i64
            }
        })
        .to_string();

        match ClientEvent::decode(&frame, 100).unwrap() {
            ClientEvent::SendMessage(p) => {
                assert_eq!(p.text, "hello");
                assert_eq!(p.timestamp, Some(1700000000000));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_timestamp_optional() {
        let frame = r#"{"event":"sendMessage","data":{"text":"x","channelId":"c","senderId":"u","senderName":"n"}}"#;
        match ClientEvent::decode(frame, 100).unwrap() {
            ClientEvent::SendMessage(p) => assert_eq!(p.timestamp, None),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_event() {
        let frame = r#"{"event":"deleteChannel","data":{"channelId":"c"}}"#;
        assert!(matches!(
            ClientEvent::decode(frame, 100),
            Err(SessionError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_decode_rejects_empty_channel() {
        let frame = r#"{"event":"joinChannel","data":{"channelId":"","userId":"u"}}"#;
        match ClientEvent::decode(frame, 100) {
            Err(SessionError::InvalidPayload(msg)) => {
                assert_eq!(msg, "channelId must not be empty")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_decode_accepts_empty_text() {
        let frame = r#"{"event":"sendMessage","data":{"text":"","channelId":"c"}}"#;
        match ClientEvent::decode(frame, 5).unwrap() {
            ClientEvent::SendMessage(p) => assert_eq!(p.text, ""),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_long_text() {
        let frame = r#"{"event":"sendMessage","data":{"text":"abcdef","channelId":"c"}}"#;
        assert!(matches!(
            ClientEvent::decode(frame, 5),
            Err(SessionError::MessageTooLong { max: 5 })
        ));
    }

    #[test]
    fn test_server_event_envelope() {
        let event = ServerEvent::UserStoppedTyping(StoppedTypingPayload {
            user_id: "u1".into(),
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "userStoppedTyping", "data": { "userId": "u1" } })
        );
        assert_eq!(event.event_name(), "userStoppedTyping");
    }

    #[test]
    fn test_online_users_envelope() {
        let event = ServerEvent::OnlineUsers(vec!["Alice".into(), "Bob".into()]);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "onlineUsers", "data": ["Alice", "Bob"] })
        );
    }
}
