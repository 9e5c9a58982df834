//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;

use channel_relay::config::{
    ChatSettings, CorsSettings, ServerSettings, Settings, WebSocketSettings,
};
use channel_relay::domain::default_channels;
use channel_relay::startup::{build_router, AppState};

/// Settings with the built-in channels and default limits
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        cors: CorsSettings {
            allowed_origins: Vec::new(),
        },
        websocket: WebSocketSettings {
            max_message_size: 65536,
            max_frame_size: 16384,
        },
        chat: ChatSettings {
            history_capacity: 1000,
            join_history_limit: 50,
            max_message_length: 4000,
        },
        channels: default_channels(),
        environment: "test".into(),
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Build the real router over fresh in-memory state
    pub fn new() -> Self {
        let state = AppState::new(test_settings());
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
