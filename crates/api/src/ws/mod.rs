//! WebSocket infrastructure for the live monitoring feed.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes. Every connection belongs to exactly
//! one organization room, fixed at upgrade time from the caller's token.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{parse_client_frame, ws_handler, ClientFrame, WsAuth};
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
