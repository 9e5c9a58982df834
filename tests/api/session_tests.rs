//! Relay Session Tests
//!
//! Drive the dispatcher through the real gateway, reading each connection's
//! outbound queue the way its socket writer would.

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use channel_relay::domain::ConnectionId;
use channel_relay::presentation::websocket::{ServerEvent, SessionEvent};
use channel_relay::startup::AppState;

use crate::common::test_settings;

struct Client {
    id: ConnectionId,
    rx: UnboundedReceiver<ServerEvent>,
}

impl Client {
    fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn drain_json(&mut self) -> Vec<serde_json::Value> {
        self.drain()
            .iter()
            .map(|e| serde_json::to_value(e).unwrap())
            .collect()
    }
}

fn connect(state: &AppState, user_id: &str, name: &str) -> Client {
    let id = ConnectionId::new();
    let (tx, rx) = mpsc::unbounded_channel();
    state.gateway.register(id, tx);
    state.dispatcher.dispatch(
        id,
        SessionEvent::Connect {
            user_id: user_id.into(),
            user_name: name.into(),
        },
    );
    Client { id, rx }
}

fn disconnect(state: &AppState, client: &Client) {
    state.dispatcher.dispatch(client.id, SessionEvent::Disconnect);
    state.gateway.unregister(&client.id);
}

fn frame(state: &AppState, client: &Client, value: serde_json::Value) {
    tokio_test::assert_ok!(state.dispatcher.handle_frame(client.id, &value.to_string()));
}

fn join(state: &AppState, client: &Client, channel_id: &str, user_id: &str) {
    frame(
        state,
        client,
        json!({"event": "joinChannel", "data": {"channelId": channel_id, "userId": user_id}}),
    );
}

fn say(state: &AppState, client: &Client, channel_id: &str, text: &str) {
    frame(
        state,
        client,
        json!({
            "event": "sendMessage",
            "data": {
                "text": text,
                "channelId": channel_id,
                "senderId": "u1",
                "senderName": "Alice"
            }
        }),
    );
}

#[tokio::test]
async fn test_join_roster_and_history() {
    let state = AppState::new(test_settings());
    let mut alice = connect(&state, "u1", "Alice");

    join(&state, &alice, "genel-sohbet", "u1");

    assert_eq!(
        alice.drain_json(),
        vec![
            json!({"event": "onlineUsers", "data": ["Alice"]}),
            json!({"event": "messageHistory", "data": []}),
        ]
    );
}

#[tokio::test]
async fn test_join_replays_last_fifty_messages() {
    let state = AppState::new(test_settings());
    let alice = connect(&state, "u1", "Alice");
    for i in 0..200 {
        say(&state, &alice, "genel-sohbet", &format!("m{i}"));
    }

    let mut bob = connect(&state, "u2", "Bob");
    join(&state, &bob, "genel-sohbet", "u2");

    let events = bob.drain();
    let ServerEvent::MessageHistory(history) = &events[1] else {
        panic!("expected history, got {:?}", events[1]);
    };
    let texts: Vec<String> = history.iter().map(|m| m.text.clone()).collect();
    let expected: Vec<String> = (150..200).map(|i| format!("m{i}")).collect();
    assert_eq!(texts, expected);
}

#[tokio::test]
async fn test_message_fan_out_with_moderation() {
    let state = AppState::new(test_settings());
    let mut alice = connect(&state, "u1", "Alice");
    let mut bob = connect(&state, "u2", "Bob");
    join(&state, &alice, "genel-sohbet", "u1");
    join(&state, &bob, "genel-sohbet", "u2");
    alice.drain();
    bob.drain();

    say(&state, &alice, "genel-sohbet", "Bu bir KÖTÜ KELIME");

    for client in [&mut alice, &mut bob] {
        let events = client.drain_json();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "message");
        assert_eq!(events[0]["data"]["isFiltered"], true);
        assert_eq!(events[1]["event"], "messageFiltered");
        assert_eq!(events[1]["data"]["messageId"], events[0]["data"]["id"]);
    }
}

#[tokio::test]
async fn test_non_member_receives_nothing() {
    let state = AppState::new(test_settings());
    let alice = connect(&state, "u1", "Alice");
    let mut carol = connect(&state, "u3", "Carol");
    join(&state, &alice, "genel-sohbet", "u1");
    join(&state, &carol, "spor-sohbet", "u3");
    carol.drain();

    say(&state, &alice, "genel-sohbet", "hello");

    assert!(carol.drain().is_empty());
}

#[tokio::test]
async fn test_disconnect_announces_leave_with_prior_identity() {
    let state = AppState::new(test_settings());
    let mut alice = connect(&state, "u1", "Alice");
    let bob = connect(&state, "u2", "Bob");
    join(&state, &alice, "genel-sohbet", "u1");
    join(&state, &bob, "genel-sohbet", "u2");
    alice.drain();

    disconnect(&state, &bob);

    assert_eq!(
        alice.drain_json(),
        vec![
            json!({"event": "onlineUsers", "data": ["Alice"]}),
            json!({"event": "userLeft", "data": {"userId": "u2", "userName": "Bob"}}),
        ]
    );
    assert_eq!(state.registry.roster_of("genel-sohbet"), vec!["Alice".to_string()]);
    assert!(state.presence.lookup(&bob.id).is_none());
}

#[tokio::test]
async fn test_empty_text_is_relayed() {
    let state = AppState::new(test_settings());
    let mut alice = connect(&state, "u1", "Alice");
    join(&state, &alice, "spor-sohbet", "u1");
    alice.drain();

    say(&state, &alice, "spor-sohbet", "");

    let events = alice.drain_json();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "message");
    assert_eq!(events[0]["data"]["text"], "");
    assert_eq!(events[0]["data"]["isFiltered"], false);
}

#[tokio::test]
async fn test_unknown_channel_is_silent() {
    let state = AppState::new(test_settings());
    let mut alice = connect(&state, "u1", "Alice");

    join(&state, &alice, "nonexistent", "u1");
    say(&state, &alice, "nonexistent", "hello");

    assert!(alice.drain().is_empty());
}

#[tokio::test]
async fn test_malformed_frames_rejected() {
    let state = AppState::new(test_settings());
    let mut alice = connect(&state, "u1", "Alice");

    assert!(state.dispatcher.handle_frame(alice.id, "{").is_err());
    assert!(state
        .dispatcher
        .handle_frame(alice.id, r#"{"event":"sendMessage","data":{"text":"hi","channelId":""}}"#)
        .is_err());
    assert!(alice.drain().is_empty());
}

#[tokio::test]
async fn test_concurrent_senders_observe_same_order() {
    let state = AppState::new(test_settings());
    let mut watcher = connect(&state, "w", "Watcher");
    join(&state, &watcher, "spor-sohbet", "w");
    watcher.drain();

    let senders: Vec<_> = (0..4)
        .map(|n| {
            let state = state.clone();
            std::thread::spawn(move || {
                let client = connect(&state, &format!("s{n}"), &format!("S{n}"));
                for i in 0..50 {
                    say(&state, &client, "spor-sohbet", &format!("{n}-{i}"));
                }
            })
        })
        .collect();
    for handle in senders {
        handle.join().unwrap();
    }

    let observed: Vec<_> = watcher
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            ServerEvent::Message(m) => Some(m.id),
            _ => None,
        })
        .collect();
    let stored: Vec<_> = state
        .registry
        .history_of("spor-sohbet")
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(observed.len(), 200);
    assert_eq!(observed, stored);
}
