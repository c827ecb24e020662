//! Guard check-in processing.

use std::sync::Arc;

use patrol_core::error::CoreError;
use patrol_core::principal::Principal;
use patrol_core::roles::Role;
use patrol_core::timeliness::classify;
use patrol_core::types::{DbId, Timestamp};
use patrol_db::models::monitoring_log::{MonitoringLogDetail, NewMonitoringLog};
use patrol_db::models::user::User;
use patrol_events::{LiveEvent, LivePublisher};
use serde::Serialize;

use crate::error::MonitorError;
use crate::store::MonitoringStore;

/// Result of a successful check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub success: bool,
    #[serde(rename = "res")]
    pub record: MonitoringLogDetail,
}

/// Records card scans as classified monitoring logs.
#[derive(Clone)]
pub struct CheckInProcessor {
    store: Arc<dyn MonitoringStore>,
    publisher: Arc<dyn LivePublisher>,
}

impl CheckInProcessor {
    pub fn new(store: Arc<dyn MonitoringStore>, publisher: Arc<dyn LivePublisher>) -> Self {
        Self { store, publisher }
    }

    /// Classify and append a check-in of `guard_id` at the checkpoint
    /// carrying `card_number`, then notify the guard's organization.
    ///
    /// The log is written unconditionally, even when its status repeats the
    /// previous one.
    pub async fn check_in(
        &self,
        principal: &Principal,
        guard_id: DbId,
        card_number: &str,
        now: Timestamp,
    ) -> Result<CheckInOutcome, MonitorError> {
        let card_number = card_number.trim();
        if guard_id <= 0 {
            return Err(CoreError::Validation("userId must be a positive id".into()).into());
        }
        if card_number.is_empty() {
            return Err(CoreError::Validation("checkpointCardNum must not be blank".into()).into());
        }

        let guard = load_active_guard(self.store.as_ref(), guard_id).await?;
        let organization_id = guard_organization(&guard)?;
        if principal.user_id != guard.id {
            principal.ensure_access(organization_id)?;
        }

        let checkpoint = self
            .store
            .find_checkpoint_by_card(card_number)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Checkpoint",
                key: format!("with card number {card_number}"),
            })?;
        if checkpoint.organization_id != organization_id {
            return Err(CoreError::CrossTenant(format!(
                "checkpoint {} belongs to another organization",
                checkpoint.checkpoint.id
            ))
            .into());
        }

        let thresholds = checkpoint.checkpoint.thresholds()?;
        let previous = self
            .store
            .find_latest_log_for_checkpoint(checkpoint.checkpoint.id)
            .await?;
        let status = classify(previous.map(|log| log.created_at), now, thresholds);

        let log = self
            .store
            .insert_log(&NewMonitoringLog {
                guard_id: guard.id,
                checkpoint_id: checkpoint.checkpoint.id,
                status,
                created_at: now,
            })
            .await?;

        tracing::info!(
            log_id = log.id,
            guard_id = guard.id,
            checkpoint_id = checkpoint.checkpoint.id,
            organization_id,
            status = %status,
            "Check-in recorded"
        );

        let record = MonitoringLogDetail::assemble(&log, &guard, &checkpoint);
        publish_log(self.publisher.as_ref(), &record);

        Ok(CheckInOutcome {
            success: true,
            record,
        })
    }
}

/// Load `guard_id` and require an active `GUARD` account.
pub(crate) async fn load_active_guard(
    store: &dyn MonitoringStore,
    guard_id: DbId,
) -> Result<User, MonitorError> {
    let user = store
        .find_user_by_id(guard_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", guard_id))?;

    if user.role()? != Role::Guard {
        return Err(CoreError::InvalidRole(format!("user {guard_id} is not a guard")).into());
    }
    if !user.status()?.is_active() {
        return Err(CoreError::InvalidRole(format!("guard {guard_id} is inactive")).into());
    }
    Ok(user)
}

pub(crate) fn guard_organization(guard: &User) -> Result<DbId, CoreError> {
    guard.organization_id.ok_or_else(|| {
        CoreError::Internal(format!("guard {} has no organization", guard.id))
    })
}

/// Push a log to its organization's dashboards. Never fails.
pub(crate) fn publish_log(publisher: &dyn LivePublisher, record: &MonitoringLogDetail) {
    match LiveEvent::logs(record.organization_id, record) {
        Ok(event) => publisher.publish(event),
        Err(e) => tracing::error!(log_id = record.id, error = %e, "Failed to encode log event"),
    }
}
