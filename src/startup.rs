//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{ChannelRegistry, PresenceTracker};
use crate::config::Settings;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::presentation::websocket::{Dispatcher, EventSink, Gateway};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChannelRegistry>,
    pub presence: Arc<PresenceTracker>,
    pub gateway: Arc<Gateway>,
    pub dispatcher: Arc<Dispatcher>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the in-memory relay from settings
    pub fn new(settings: Settings) -> Self {
        let presence = Arc::new(PresenceTracker::new());
        let registry = Arc::new(ChannelRegistry::new(
            settings.channels.clone(),
            Arc::clone(&presence),
            settings.chat.registry_options(),
        ));
        let gateway = Arc::new(Gateway::new());
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&presence),
            Arc::clone(&gateway) as Arc<dyn EventSink>,
            settings.chat.max_message_length,
        ));

        tracing::info!(channels = registry.channel_count(), "Channel registry ready");

        Self {
            registry,
            presence,
            gateway,
            dispatcher,
            settings: Arc::new(settings),
        }
    }
}

/// Build the full router with middleware applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let addr: SocketAddr = settings.server.socket_addr()?;
        let state = AppState::new(settings);
        let router = build_router(state);

        let listener = TcpListener::bind(addr).await?;

        Ok(Self { listener, router })
    }

    /// Run the server until Ctrl-C or SIGTERM
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
