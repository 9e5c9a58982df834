//! Application settings and configuration structures.

use std::collections::HashSet;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::application::services::{
    RegistryOptions, DEFAULT_HISTORY_CAPACITY, DEFAULT_JOIN_HISTORY_LIMIT, MAX_HISTORY_CAPACITY,
};
use crate::domain::{default_channels, ChannelDefinition};

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// WebSocket configuration
    pub websocket: WebSocketSettings,

    /// History and message limits
    pub chat: ChatSettings,

    /// Channels created at startup. Falls back to the built-in set.
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelDefinition>,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// WebSocket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// Maximum message size in bytes (default: 64KB)
    pub max_message_size: usize,

    /// Maximum frame size in bytes (default: 16KB)
    pub max_frame_size: usize,
}

/// Channel history and message limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    /// Messages retained per channel, at most 1000 (default: 1000)
    pub history_capacity: usize,

    /// Messages replayed on join (default: 50)
    pub join_history_limit: usize,

    /// Longest accepted message text in characters (default: 4000)
    pub max_message_length: usize,
}

impl ChatSettings {
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            history_capacity: self.history_capacity,
            join_history_limit: self.join_history_limit,
        }
    }
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the channel list or limits are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("websocket.max_message_size", 65536_i64)? // 64KB
            .set_default("websocket.max_frame_size", 16384_i64)? // 16KB
            .set_default("chat.history_capacity", DEFAULT_HISTORY_CAPACITY as i64)?
            .set_default("chat.join_history_limit", DEFAULT_JOIN_HISTORY_LIMIT as i64)?
            .set_default("chat.max_message_length", 4000_i64)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3001 -> server.port = 3001
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate().map(|_| settings))
    }

    /// Reject configurations the relay cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.history_capacity == 0 {
            return Err(ConfigError::Message(
                "chat.history_capacity must be greater than zero".into(),
            ));
        }

        if self.chat.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::Message(format!(
                "chat.history_capacity must not exceed {}",
                MAX_HISTORY_CAPACITY
            )));
        }

        if self.chat.max_message_length == 0 {
            return Err(ConfigError::Message(
                "chat.max_message_length must be greater than zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.id.trim().is_empty() {
                return Err(ConfigError::Message("Channel id must not be empty".into()));
            }
            if !seen.insert(channel.id.as_str()) {
                return Err(ConfigError::Message(format!(
                    "Duplicate channel id: {}",
                    channel.id
                )));
            }
        }

        Ok(())
    }
}

impl ServerSettings {
    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
