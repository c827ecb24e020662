//! Repository for the `sites` table.

use patrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::site::{CreateSite, Site, UpdateSite};

const COLUMNS: &str = "id, organization_id, name, image_url, center_lat, center_lng, zoom, \
                       created_at, updated_at";

/// Provides CRUD operations for sites.
pub struct SiteRepo;

impl SiteRepo {
    pub async fn create(pool: &PgPool, input: &CreateSite) -> Result<Site, sqlx::Error> {
        let query = format!(
            "INSERT INTO sites (organization_id, name, image_url, center_lat, center_lng, zoom)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(input.organization_id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.center_lat)
            .bind(input.center_lng)
            .bind(input.zoom)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE id = $1");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sites, restricted to one organization when `organization_id` is set.
    pub async fn list(
        pool: &PgPool,
        organization_id: Option<DbId>,
    ) -> Result<Vec<Site>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sites
             WHERE ($1::BIGINT IS NULL OR organization_id = $1)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSite,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "UPDATE sites SET
                name = COALESCE($2, name),
                image_url = COALESCE($3, image_url),
                center_lat = COALESCE($4, center_lat),
                center_lng = COALESCE($5, center_lng),
                zoom = COALESCE($6, zoom)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.center_lat)
            .bind(input.center_lng)
            .bind(input.zoom)
            .fetch_optional(pool)
            .await
    }

    /// Whether any checkpoint of the site has monitoring history.
    pub async fn has_history(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM monitoring_logs ml
                JOIN checkpoints c ON c.id = ml.checkpoint_id
                WHERE c.site_id = $1
             )",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a site together with its (history-free) checkpoints.
    ///
    /// Returns `true` if the site row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM checkpoints WHERE site_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM sites WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
