//! Handlers for the `/checkpoints` resource (the checkpoint registry).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use patrol_core::error::CoreError;
use patrol_core::geo::{geo_columns, GeoPoint, ImagePosition};
use patrol_core::timeliness::{Thresholds, DEFAULT_NORMAL_MINUTES, DEFAULT_PASS_MINUTES};
use patrol_core::types::DbId;
use patrol_db::models::checkpoint::{CheckpointResponse, CreateCheckpoint, UpdateCheckpoint};
use patrol_db::repositories::CheckpointRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::{load_checkpoint, load_site};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::query::SiteFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /checkpoints`.
///
/// Thresholds are in minutes and default to 10 (`normalTime`) and 5
/// (`passTime`).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckpointRequest {
    pub site_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub card_number: String,
    #[validate(range(min = 1))]
    pub normal_time: Option<i32>,
    #[validate(range(min = 1))]
    pub pass_time: Option<i32>,
    #[validate(nested)]
    pub position: Option<ImagePosition>,
    #[validate(nested)]
    pub location: Option<GeoPoint>,
}

/// Request body for `PUT /checkpoints/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckpointRequest {
    /// Move the checkpoint to another site of the same organization.
    pub site_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub card_number: Option<String>,
    #[validate(range(min = 1))]
    pub normal_time: Option<i32>,
    #[validate(range(min = 1))]
    pub pass_time: Option<i32>,
    #[validate(nested)]
    pub position: Option<ImagePosition>,
    #[validate(nested)]
    pub location: Option<GeoPoint>,
}

/// GET /api/v1/checkpoints?siteId=
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Query(filter): Query<SiteFilter>,
) -> AppResult<Json<DataResponse<Vec<CheckpointResponse>>>> {
    let site = load_site(&state, &user.principal, filter.site_id).await?;
    let checkpoints = CheckpointRepo::list_by_site(&state.pool, site.id).await?;
    Ok(Json(DataResponse {
        data: checkpoints.iter().map(|c| c.to_response()).collect(),
    }))
}

/// POST /api/v1/checkpoints
///
/// A duplicate card number is rejected with 409 by `uq_checkpoints_card_number`.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateCheckpointRequest>,
) -> AppResult<(StatusCode, Json<CheckpointResponse>)> {
    let site = load_site(&state, &admin.principal, input.site_id).await?;
    let normal_minutes = input.normal_time.unwrap_or(DEFAULT_NORMAL_MINUTES);
    let pass_minutes = input.pass_time.unwrap_or(DEFAULT_PASS_MINUTES);
    Thresholds::new(normal_minutes, pass_minutes)?;
    let (latitude, longitude) = geo_columns(input.location);

    let checkpoint = CheckpointRepo::create(
        &state.pool,
        &CreateCheckpoint {
            site_id: site.id,
            name: input.name.trim().to_string(),
            card_number: input.card_number.trim().to_string(),
            normal_minutes,
            pass_minutes,
            position_x: input.position.map(|p| p.x_percent),
            position_y: input.position.map(|p| p.y_percent),
            latitude,
            longitude,
        },
    )
    .await?;

    tracing::info!(
        checkpoint_id = checkpoint.id,
        site_id = site.id,
        organization_id = site.organization_id,
        "Checkpoint created"
    );
    Ok((StatusCode::CREATED, Json(checkpoint.to_response())))
}

/// PUT /api/v1/checkpoints/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCheckpointRequest>,
) -> AppResult<Json<CheckpointResponse>> {
    let current = load_checkpoint(&state, &admin.principal, id).await?;

    if let Some(site_id) = input.site_id {
        let target = load_site(&state, &admin.principal, site_id).await?;
        if target.organization_id != current.organization_id {
            return Err(AppError::Core(CoreError::CrossTenant(
                "A checkpoint cannot move to another organization's site".into(),
            )));
        }
    }

    // Validate the thresholds as they will be stored.
    Thresholds::new(
        input.normal_time.unwrap_or(current.checkpoint.normal_minutes),
        input.pass_time.unwrap_or(current.checkpoint.pass_minutes),
    )?;

    let (latitude, longitude) = geo_columns(input.location);
    let update = UpdateCheckpoint {
        site_id: input.site_id,
        name: input.name.map(|n| n.trim().to_string()),
        card_number: input.card_number.map(|c| c.trim().to_string()),
        normal_minutes: input.normal_time,
        pass_minutes: input.pass_time,
        position_x: input.position.map(|p| p.x_percent),
        position_y: input.position.map(|p| p.y_percent),
        latitude,
        longitude,
    };
    let checkpoint = CheckpointRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Checkpoint", id)))?;
    Ok(Json(checkpoint.to_response()))
}

/// DELETE /api/v1/checkpoints/{id}
///
/// Refused with 409 once the checkpoint has any monitoring log.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_checkpoint(&state, &admin.principal, id).await?;
    if CheckpointRepo::has_history(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Checkpoint has monitoring history and cannot be deleted".into(),
        )));
    }
    if CheckpointRepo::delete(&state.pool, id).await? {
        tracing::info!(checkpoint_id = id, "Checkpoint deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Checkpoint", id)))
    }
}
