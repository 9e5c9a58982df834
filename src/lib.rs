//! # Channel Relay Library
//!
//! A multi-channel chat relay with:
//! - A WebSocket endpoint for joining channels, chatting and typing notices
//! - Per-channel moderation of message text
//! - Bounded in-memory history replayed to joiners
//! - A small HTTP API for channel discovery, health and metrics
//!
//! ## Architecture
//!
//! - **Domain Layer**: Channels, messages, users and the moderation engine
//! - **Application Layer**: Channel registry and presence tracker
//! - **Infrastructure Layer**: Prometheus metrics
//! - **Presentation Layer**: HTTP handlers and the WebSocket session dispatcher
//!
//! ## Module Structure
//!
//! ```text
//! channel_relay/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects and moderation
//! +-- application/    Registry, presence and DTOs
//! +-- infrastructure/ Metrics
//! +-- presentation/   HTTP routes and WebSocket handlers
//! +-- shared/         Errors, validation, message id generation
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Channel state and presence
pub mod application;

// Infrastructure layer - Metrics
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
