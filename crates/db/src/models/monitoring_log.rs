//! Monitoring log (attendance ledger) models.
//!
//! Logs are append-only: there is no update DTO.

use patrol_core::error::CoreError;
use patrol_core::timeliness::CheckpointStatus;
use patrol_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::checkpoint::{Checkpoint, ScopedCheckpoint};
use super::user::User;

/// A row from the `monitoring_logs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringLog {
    pub id: DbId,
    pub guard_id: DbId,
    pub checkpoint_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}

impl MonitoringLog {
    pub fn status(&self) -> Result<CheckpointStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for appending a log. `created_at` is assigned by the server clock.
#[derive(Debug, Clone)]
pub struct NewMonitoringLog {
    pub guard_id: DbId,
    pub checkpoint_id: DbId,
    pub status: CheckpointStatus,
    pub created_at: Timestamp,
}

/// A log joined with guard and checkpoint summaries, as shown on dashboards
/// and pushed over the live feed.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringLogDetail {
    pub id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub guard_id: DbId,
    pub guard_login: String,
    pub guard_username: Option<String>,
    pub organization_id: DbId,
    pub checkpoint_id: DbId,
    pub checkpoint_name: String,
    pub site_id: DbId,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

impl MonitoringLogDetail {
    /// Denormalize a freshly written log with the guard and checkpoint it
    /// refers to, without another round trip.
    pub fn assemble(log: &MonitoringLog, guard: &User, checkpoint: &ScopedCheckpoint) -> Self {
        Self {
            id: log.id,
            status: log.status.clone(),
            created_at: log.created_at,
            guard_id: guard.id,
            guard_login: guard.login.clone(),
            guard_username: guard.username.clone(),
            organization_id: checkpoint.organization_id,
            checkpoint_id: checkpoint.checkpoint.id,
            checkpoint_name: checkpoint.checkpoint.name.clone(),
            site_id: checkpoint.checkpoint.site_id,
            position_x: checkpoint.checkpoint.position_x,
            position_y: checkpoint.checkpoint.position_y,
        }
    }
}

/// Flat row for the "every checkpoint with its latest log" sweep query.
#[derive(Debug, Clone, FromRow)]
pub struct CheckpointLatestLogRow {
    #[sqlx(flatten)]
    pub checkpoint: Checkpoint,
    pub organization_id: DbId,
    pub log_id: Option<DbId>,
    pub log_guard_id: Option<DbId>,
    pub log_status: Option<String>,
    pub log_created_at: Option<Timestamp>,
}

impl CheckpointLatestLogRow {
    /// Split into the scoped checkpoint and its latest log, if any.
    pub fn into_parts(self) -> (ScopedCheckpoint, Option<MonitoringLog>) {
        let latest = match (
            self.log_id,
            self.log_guard_id,
            self.log_status,
            self.log_created_at,
        ) {
            (Some(id), Some(guard_id), Some(status), Some(created_at)) => Some(MonitoringLog {
                id,
                guard_id,
                checkpoint_id: self.checkpoint.id,
                status,
                created_at,
            }),
            _ => None,
        };
        let scoped = ScopedCheckpoint {
            checkpoint: self.checkpoint,
            organization_id: self.organization_id,
        };
        (scoped, latest)
    }
}

/// The most recent checkpoint a guard checked in at.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardPosition {
    pub guard_id: DbId,
    pub login: String,
    pub username: Option<String>,
    pub checkpoint_id: DbId,
    pub checkpoint_name: String,
    pub site_id: DbId,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
}
