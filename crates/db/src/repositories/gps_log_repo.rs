//! Repository for the append-only `gps_logs` trail.

use patrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::gps_log::{GpsLog, NewGpsLog};

const COLUMNS: &str = "id, guard_id, latitude, longitude, created_at";

/// Provides append and read operations for GPS pings.
pub struct GpsLogRepo;

impl GpsLogRepo {
    pub async fn insert(pool: &PgPool, input: &NewGpsLog) -> Result<GpsLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO gps_logs (guard_id, latitude, longitude, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GpsLog>(&query)
            .bind(input.guard_id)
            .bind(input.location.lat)
            .bind(input.location.lng)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// The latest ping of every guard in an organization.
    pub async fn list_latest_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<GpsLog>, sqlx::Error> {
        sqlx::query_as::<_, GpsLog>(
            "SELECT DISTINCT ON (g.guard_id)
                    g.id, g.guard_id, g.latitude, g.longitude, g.created_at
             FROM gps_logs g
             JOIN users u ON u.id = g.guard_id
             WHERE u.organization_id = $1
             ORDER BY g.guard_id, g.created_at DESC, g.id DESC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// A guard's most recent pings, newest first.
    pub async fn list_trail(
        pool: &PgPool,
        guard_id: DbId,
        limit: i64,
    ) -> Result<Vec<GpsLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gps_logs
             WHERE guard_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, GpsLog>(&query)
            .bind(guard_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
