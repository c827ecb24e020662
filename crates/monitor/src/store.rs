//! Persistence port used by the monitoring services.

use async_trait::async_trait;
use patrol_core::types::DbId;
use patrol_db::models::checkpoint::ScopedCheckpoint;
use patrol_db::models::gps_log::{GpsLog, NewGpsLog};
use patrol_db::models::monitoring_log::{MonitoringLog, NewMonitoringLog};
use patrol_db::models::user::User;
use patrol_db::repositories::{CheckpointRepo, GpsLogRepo, MonitoringLogRepo, UserRepo};
use patrol_db::DbPool;

/// Reads and appends needed by check-in processing and the sweeper.
#[async_trait]
pub trait MonitoringStore: Send + Sync {
    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn find_checkpoint_by_card(
        &self,
        card_number: &str,
    ) -> Result<Option<ScopedCheckpoint>, sqlx::Error>;

    /// Latest by `created_at`, ties broken by the higher `id`.
    async fn find_latest_log_for_checkpoint(
        &self,
        checkpoint_id: DbId,
    ) -> Result<Option<MonitoringLog>, sqlx::Error>;

    async fn insert_log(&self, input: &NewMonitoringLog) -> Result<MonitoringLog, sqlx::Error>;

    /// Every checkpoint paired with its latest log, if it has one.
    async fn find_all_checkpoints_with_latest_log(
        &self,
    ) -> Result<Vec<(ScopedCheckpoint, Option<MonitoringLog>)>, sqlx::Error>;

    async fn insert_gps_log(&self, input: &NewGpsLog) -> Result<GpsLog, sqlx::Error>;
}

/// [`MonitoringStore`] over the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgMonitoringStore {
    pool: DbPool,
}

impl PgMonitoringStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MonitoringStore for PgMonitoringStore {
    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_checkpoint_by_card(
        &self,
        card_number: &str,
    ) -> Result<Option<ScopedCheckpoint>, sqlx::Error> {
        CheckpointRepo::find_by_card_number(&self.pool, card_number).await
    }

    async fn find_latest_log_for_checkpoint(
        &self,
        checkpoint_id: DbId,
    ) -> Result<Option<MonitoringLog>, sqlx::Error> {
        MonitoringLogRepo::find_latest_for_checkpoint(&self.pool, checkpoint_id).await
    }

    async fn insert_log(&self, input: &NewMonitoringLog) -> Result<MonitoringLog, sqlx::Error> {
        MonitoringLogRepo::insert(&self.pool, input).await
    }

    async fn find_all_checkpoints_with_latest_log(
        &self,
    ) -> Result<Vec<(ScopedCheckpoint, Option<MonitoringLog>)>, sqlx::Error> {
        let rows = MonitoringLogRepo::list_checkpoints_with_latest_log(&self.pool).await?;
        Ok(rows.into_iter().map(|row| row.into_parts()).collect())
    }

    async fn insert_gps_log(&self, input: &NewGpsLog) -> Result<GpsLog, sqlx::Error> {
        GpsLogRepo::insert(&self.pool, input).await
    }
}
