//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus PORT / SERVER_HOST / SERVER_PORT)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! Channels and their moderation rules come from the `channels` list; when
//! it is absent the built-in default channels are used.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use channel_relay::config::Settings;
//!
//! let settings = Settings::load()?;
//! let addr = settings.server.socket_addr()?;
//! ```

mod settings;

pub use settings::*;
