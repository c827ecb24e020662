//! Live event routing.
//!
//! The [`LiveRouter`] subscribes to the event bus and delivers each event to
//! the WebSocket connections in the event's organization room.

pub mod router;

pub use router::LiveRouter;
