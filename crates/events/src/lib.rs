//! Live event plumbing for the patrol monitoring backend.
//!
//! - [`LiveEvent`] -- an organization-scoped notification (`logs` or `gps`).
//! - [`LivePublisher`] -- the port domain code publishes through.
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, the production [`LivePublisher`].

pub mod bus;

pub use bus::{EventBus, LiveEvent, LiveEventKind, LivePublisher};
