//! Event-to-room routing.

use std::sync::Arc;

use axum::extract::ws::Message;
use patrol_events::LiveEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Pushes bus events to the organization rooms they are addressed to.
///
/// Events for an organization with no connected dashboards are dropped.
pub struct LiveRouter {
    ws_manager: Arc<WsManager>,
}

impl LiveRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the routing loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](patrol_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<LiveEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.route_event(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Live router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, live router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event to its organization's room.
    pub async fn route_event(&self, event: &LiveEvent) -> usize {
        let frame = event.to_frame().to_string();
        let delivered = self
            .ws_manager
            .send_to_organization(event.organization_id, Message::Text(frame.into()))
            .await;
        tracing::debug!(
            event = event.kind.as_str(),
            organization_id = event.organization_id,
            delivered,
            "Live event routed"
        );
        delivered
    }
}
