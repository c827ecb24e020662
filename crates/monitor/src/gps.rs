//! GPS ping recording.

use std::sync::Arc;

use patrol_core::error::CoreError;
use patrol_core::geo::GeoPoint;
use patrol_core::principal::Principal;
use patrol_core::types::{DbId, Timestamp};
use patrol_db::models::gps_log::{GpsLogResponse, NewGpsLog};
use patrol_events::{LiveEvent, LivePublisher};
use validator::Validate;

use crate::checkin::{guard_organization, load_active_guard};
use crate::error::MonitorError;
use crate::store::MonitoringStore;

/// Appends GPS pings to a guard's trail and streams them live.
#[derive(Clone)]
pub struct GpsRecorder {
    store: Arc<dyn MonitoringStore>,
    publisher: Arc<dyn LivePublisher>,
}

impl GpsRecorder {
    pub fn new(store: Arc<dyn MonitoringStore>, publisher: Arc<dyn LivePublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn record(
        &self,
        principal: &Principal,
        guard_id: DbId,
        location: GeoPoint,
        now: Timestamp,
    ) -> Result<GpsLogResponse, MonitorError> {
        location
            .validate()
            .map_err(|e| CoreError::Validation(format!("invalid location: {e}")))?;

        let guard = load_active_guard(self.store.as_ref(), guard_id).await?;
        let organization_id = guard_organization(&guard)?;
        if principal.user_id != guard.id {
            principal.ensure_access(organization_id)?;
        }

        let ping = self
            .store
            .insert_gps_log(&NewGpsLog {
                guard_id,
                location,
                created_at: now,
            })
            .await?
            .to_response();

        tracing::debug!(guard_id, organization_id, "GPS ping recorded");

        match LiveEvent::gps(organization_id, &ping) {
            Ok(event) => self.publisher.publish(event),
            Err(e) => tracing::error!(error = %e, "Failed to encode gps event"),
        }
        Ok(ping)
    }
}
