//! Application Layer
//!
//! Contains the shared in-memory state services and data transfer objects
//! (DTOs). This layer sits between the WebSocket/HTTP adapters and the
//! domain layer.

pub mod services;
pub mod dto;
