//! Channel Query API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use channel_relay::domain::ConnectionId;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_list_channels() {
    let app = TestApp::new();

    let response = app.get("/api/channels").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["genel-sohbet", "spor-sohbet"]);
    assert_eq!(body[0]["userCount"], 0);
}

#[tokio::test]
async fn test_list_channels_counts_members() {
    let app = TestApp::new();
    let conn = ConnectionId::new();
    app.state.presence.register(conn, "u1", "Alice");
    app.state.registry.join("spor-sohbet", conn).unwrap();

    let body = body_json(app.get("/api/channels").await).await;

    assert_eq!(body[0]["userCount"], 0);
    assert_eq!(body[1]["userCount"], 1);
}

#[tokio::test]
async fn test_describe_channel() {
    let app = TestApp::new();

    let response = app.get("/api/channels/genel-sohbet").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "genel-sohbet");
    assert_eq!(body["messageCount"], 0);
    assert_eq!(
        body["filterRules"][0],
        json!({
            "id": "1",
            "type": "KEYWORD",
            "value": "kötü kelime",
            "action": "REPLACE",
            "replacementText": "***"
        })
    );
}

#[tokio::test]
async fn test_describe_unknown_channel_is_404() {
    let app = TestApp::new();

    let response = app.get("/api/channels/nonexistent").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Channel not found");
    assert!(body["code"].is_number());
}

#[tokio::test]
async fn test_ws_handshake_requires_upgrade() {
    let app = TestApp::new();

    let response = app.get("/ws?userId=u1&userName=Alice").await;

    assert!(response.status().is_client_error());
}
