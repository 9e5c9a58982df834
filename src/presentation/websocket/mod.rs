//! WebSocket Gateway
//!
//! Real-time chat relay over WebSocket connections.

pub mod dispatcher;
pub mod gateway;
pub mod handler;
pub mod messages;
pub mod session;

pub use dispatcher::{Dispatcher, EventSink, SessionEvent};
pub use gateway::Gateway;
pub use handler::{ws_handler, HandshakeQuery};
pub use messages::{ClientEvent, ServerEvent, SessionError};
pub use session::SessionState;
