//! Repository for the `checkpoints` table.
//!
//! Reads return [`ScopedCheckpoint`] so callers can check tenancy without a
//! second query for the owning site.

use patrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::checkpoint::{
    Checkpoint, CreateCheckpoint, ScopedCheckpoint, UpdateCheckpoint,
};

const COLUMNS: &str = "id, site_id, name, card_number, normal_minutes, pass_minutes, \
                       position_x, position_y, latitude, longitude, created_at, updated_at";

/// `COLUMNS` qualified for joins against `sites s`.
const SCOPED_COLUMNS: &str = "c.id, c.site_id, c.name, c.card_number, c.normal_minutes, \
                              c.pass_minutes, c.position_x, c.position_y, c.latitude, \
                              c.longitude, c.created_at, c.updated_at, s.organization_id";

/// Provides CRUD operations for checkpoints.
pub struct CheckpointRepo;

impl CheckpointRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCheckpoint,
    ) -> Result<Checkpoint, sqlx::Error> {
        let query = format!(
            "INSERT INTO checkpoints
                (site_id, name, card_number, normal_minutes, pass_minutes,
                 position_x, position_y, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(input.site_id)
            .bind(&input.name)
            .bind(&input.card_number)
            .bind(input.normal_minutes)
            .bind(input.pass_minutes)
            .bind(input.position_x)
            .bind(input.position_y)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScopedCheckpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {SCOPED_COLUMNS} FROM checkpoints c
             JOIN sites s ON s.id = c.site_id
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, ScopedCheckpoint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a scanned card number to its checkpoint.
    pub async fn find_by_card_number(
        pool: &PgPool,
        card_number: &str,
    ) -> Result<Option<ScopedCheckpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {SCOPED_COLUMNS} FROM checkpoints c
             JOIN sites s ON s.id = c.site_id
             WHERE c.card_number = $1"
        );
        sqlx::query_as::<_, ScopedCheckpoint>(&query)
            .bind(card_number)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_site(
        pool: &PgPool,
        site_id: DbId,
    ) -> Result<Vec<Checkpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkpoints WHERE site_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(site_id)
            .fetch_all(pool)
            .await
    }

    /// Update a checkpoint. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCheckpoint,
    ) -> Result<Option<Checkpoint>, sqlx::Error> {
        let query = format!(
            "UPDATE checkpoints SET
                site_id = COALESCE($2, site_id),
                name = COALESCE($3, name),
                card_number = COALESCE($4, card_number),
                normal_minutes = COALESCE($5, normal_minutes),
                pass_minutes = COALESCE($6, pass_minutes),
                position_x = COALESCE($7, position_x),
                position_y = COALESCE($8, position_y),
                latitude = COALESCE($9, latitude),
                longitude = COALESCE($10, longitude)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(id)
            .bind(input.site_id)
            .bind(&input.name)
            .bind(&input.card_number)
            .bind(input.normal_minutes)
            .bind(input.pass_minutes)
            .bind(input.position_x)
            .bind(input.position_y)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(pool)
            .await
    }

    pub async fn has_history(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM monitoring_logs WHERE checkpoint_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM checkpoints WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
