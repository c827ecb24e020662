//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`LiveEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use patrol_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// LiveEvent
// ---------------------------------------------------------------------------

/// Channel a live event is delivered on. Serialized as the WebSocket
/// frame's `event` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveEventKind {
    /// A monitoring log was appended.
    Logs,
    /// A GPS ping was recorded.
    Gps,
}

impl LiveEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LiveEventKind::Logs => "logs",
            LiveEventKind::Gps => "gps",
        }
    }
}

/// A notification addressed to every live dashboard of one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEvent {
    pub kind: LiveEventKind,

    /// Only connections joined to this organization's room receive it.
    pub organization_id: DbId,

    /// The record, already in its API representation.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LiveEvent {
    pub fn new(kind: LiveEventKind, organization_id: DbId, payload: serde_json::Value) -> Self {
        Self {
            kind,
            organization_id,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Build a `logs` event from any serializable record.
    pub fn logs<T: Serialize>(
        organization_id: DbId,
        record: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            LiveEventKind::Logs,
            organization_id,
            serde_json::to_value(record)?,
        ))
    }

    /// Build a `gps` event from any serializable record.
    pub fn gps<T: Serialize>(organization_id: DbId, record: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            LiveEventKind::Gps,
            organization_id,
            serde_json::to_value(record)?,
        ))
    }

    /// The JSON frame sent to WebSocket clients: `{"event": .., "data": ..}`.
    pub fn to_frame(&self) -> serde_json::Value {
        serde_json::json!({
            "event": self.kind.as_str(),
            "data": self.payload,
        })
    }
}

// ---------------------------------------------------------------------------
// LivePublisher
// ---------------------------------------------------------------------------

/// Where domain code sends live notifications.
///
/// Publishing is fire-and-forget: it never fails and never blocks, and an
/// event with no listeners is dropped.
pub trait LivePublisher: Send + Sync {
    fn publish(&self, event: LiveEvent);
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`LiveEvent`].
pub struct EventBus {
    sender: broadcast::Sender<LiveEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }
}

impl LivePublisher for EventBus {
    fn publish(&self, event: LiveEvent) {
        tracing::debug!(
            kind = event.kind.as_str(),
            organization_id = event.organization_id,
            "Publishing live event"
        );
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = LiveEvent::logs(7, &serde_json::json!({"id": 42, "status": "LATE"}))
            .expect("json value always serializes");
        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, LiveEventKind::Logs);
        assert_eq!(received.organization_id, 7);
        assert_eq!(received.payload["status"], "LATE");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(LiveEvent::new(LiveEventKind::Gps, 1, serde_json::json!({})));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.kind, LiveEventKind::Gps);
        assert_eq!(e2.kind, LiveEventKind::Gps);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(LiveEvent::new(LiveEventKind::Logs, 1, serde_json::json!({})));
    }

    #[test]
    fn frame_uses_event_and_data_keys() {
        let event = LiveEvent::new(LiveEventKind::Gps, 3, serde_json::json!({"guardId": 5}));
        let frame = event.to_frame();
        assert_eq!(frame["event"], "gps");
        assert_eq!(frame["data"]["guardId"], 5);
        assert!(frame.get("organization_id").is_none());
    }
}
