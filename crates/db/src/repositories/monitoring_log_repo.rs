//! Repository for the append-only `monitoring_logs` ledger.
//!
//! "Latest" always means `ORDER BY created_at DESC, id DESC LIMIT 1`, served
//! by `idx_monitoring_logs_checkpoint_latest`.

use patrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::monitoring_log::{
    CheckpointLatestLogRow, GuardPosition, MonitoringLog, MonitoringLogDetail, NewMonitoringLog,
};

const COLUMNS: &str = "id, guard_id, checkpoint_id, status, created_at";

/// Joined select producing [`MonitoringLogDetail`] rows.
const DETAIL_SELECT: &str = "SELECT ml.id, ml.status, ml.created_at, ml.guard_id, \
        u.login AS guard_login, u.username AS guard_username, s.organization_id, \
        ml.checkpoint_id, c.name AS checkpoint_name, c.site_id, c.position_x, c.position_y \
     FROM monitoring_logs ml \
     JOIN users u ON u.id = ml.guard_id \
     JOIN checkpoints c ON c.id = ml.checkpoint_id \
     JOIN sites s ON s.id = c.site_id";

/// Provides append and read operations for monitoring logs.
pub struct MonitoringLogRepo;

impl MonitoringLogRepo {
    /// Append a log row. Existing rows are never touched.
    pub async fn insert(
        pool: &PgPool,
        input: &NewMonitoringLog,
    ) -> Result<MonitoringLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO monitoring_logs (guard_id, checkpoint_id, status, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonitoringLog>(&query)
            .bind(input.guard_id)
            .bind(input.checkpoint_id)
            .bind(input.status.as_str())
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// The most recent log of a checkpoint, if any.
    pub async fn find_latest_for_checkpoint(
        pool: &PgPool,
        checkpoint_id: DbId,
    ) -> Result<Option<MonitoringLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM monitoring_logs
             WHERE checkpoint_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, MonitoringLog>(&query)
            .bind(checkpoint_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MonitoringLogDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ml.id = $1");
        sqlx::query_as::<_, MonitoringLogDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every checkpoint joined with its organization and latest log.
    ///
    /// Checkpoints without any log are included with `NULL` log columns.
    pub async fn list_checkpoints_with_latest_log(
        pool: &PgPool,
    ) -> Result<Vec<CheckpointLatestLogRow>, sqlx::Error> {
        sqlx::query_as::<_, CheckpointLatestLogRow>(
            "SELECT c.id, c.site_id, c.name, c.card_number, c.normal_minutes, c.pass_minutes,
                    c.position_x, c.position_y, c.latitude, c.longitude,
                    c.created_at, c.updated_at, s.organization_id,
                    ml.id AS log_id, ml.guard_id AS log_guard_id,
                    ml.status AS log_status, ml.created_at AS log_created_at
             FROM checkpoints c
             JOIN sites s ON s.id = c.site_id
             LEFT JOIN LATERAL (
                SELECT id, guard_id, status, created_at FROM monitoring_logs
                WHERE checkpoint_id = c.id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
             ) ml ON TRUE
             ORDER BY c.id",
        )
        .fetch_all(pool)
        .await
    }

    /// One page of the latest log per checkpoint of a site.
    pub async fn list_latest_by_site(
        pool: &PgPool,
        site_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MonitoringLogDetail>, sqlx::Error> {
        sqlx::query_as::<_, MonitoringLogDetail>(
            "SELECT ml.id, ml.status, ml.created_at, ml.guard_id,
                    u.login AS guard_login, u.username AS guard_username, s.organization_id,
                    c.id AS checkpoint_id, c.name AS checkpoint_name, c.site_id,
                    c.position_x, c.position_y
             FROM checkpoints c
             JOIN sites s ON s.id = c.site_id
             JOIN LATERAL (
                SELECT id, guard_id, status, created_at FROM monitoring_logs
                WHERE checkpoint_id = c.id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
             ) ml ON TRUE
             JOIN users u ON u.id = ml.guard_id
             WHERE c.site_id = $1
             ORDER BY ml.created_at DESC, ml.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(site_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Number of checkpoints of a site that have at least one log.
    pub async fn count_latest_by_site(pool: &PgPool, site_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkpoints c
             WHERE c.site_id = $1
               AND EXISTS (SELECT 1 FROM monitoring_logs ml WHERE ml.checkpoint_id = c.id)",
        )
        .bind(site_id)
        .fetch_one(pool)
        .await
    }

    /// One page of a site's full ledger, newest first.
    pub async fn list_history_by_site(
        pool: &PgPool,
        site_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MonitoringLogDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE c.site_id = $1
             ORDER BY ml.created_at DESC, ml.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, MonitoringLogDetail>(&query)
            .bind(site_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_history_by_site(pool: &PgPool, site_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM monitoring_logs ml
             JOIN checkpoints c ON c.id = ml.checkpoint_id
             WHERE c.site_id = $1",
        )
        .bind(site_id)
        .fetch_one(pool)
        .await
    }

    /// The checkpoint each guard of an organization last logged at.
    pub async fn list_guard_positions(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<GuardPosition>, sqlx::Error> {
        sqlx::query_as::<_, GuardPosition>(
            "SELECT DISTINCT ON (ml.guard_id)
                    ml.guard_id, u.login, u.username,
                    c.id AS checkpoint_id, c.name AS checkpoint_name, c.site_id,
                    c.position_x, c.position_y, ml.status, ml.created_at
             FROM monitoring_logs ml
             JOIN users u ON u.id = ml.guard_id
             JOIN checkpoints c ON c.id = ml.checkpoint_id
             WHERE u.organization_id = $1
             ORDER BY ml.guard_id, ml.created_at DESC, ml.id DESC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }
}
