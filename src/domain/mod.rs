//! # Domain Layer
//!
//! The domain layer contains the core rules of the relay. It is
//! independent of the transport and HTTP adapters.
//!
//! ## Structure
//!
//! - **entities**: Channel definitions, moderation rules, messages, users
//! - **value_objects**: Connection and message identifiers
//! - **services**: The moderation pipeline

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
