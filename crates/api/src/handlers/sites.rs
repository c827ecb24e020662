//! Handlers for the `/sites` resource (patrolled objects).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use patrol_core::error::CoreError;
use patrol_core::geo::{geo_columns, GeoPoint};
use patrol_core::types::DbId;
use patrol_db::models::checkpoint::CheckpointResponse;
use patrol_db::models::site::{CreateSite, SiteResponse, UpdateSite};
use patrol_db::repositories::{CheckpointRepo, SiteRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::{list_scope, load_site};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::query::OrganizationFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /sites`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteRequest {
    pub organization_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(nested)]
    pub center: Option<GeoPoint>,
    #[validate(range(min = 0.0, max = 20.0))]
    pub zoom: Option<f64>,
}

/// Request body for `PUT /sites/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(nested)]
    pub center: Option<GeoPoint>,
    #[validate(range(min = 0.0, max = 20.0))]
    pub zoom: Option<f64>,
}

/// A site with its checkpoints, for the floor-plan view.
#[derive(Debug, Serialize)]
pub struct SiteDetail {
    #[serde(flatten)]
    pub site: SiteResponse,
    pub checkpoints: Vec<CheckpointResponse>,
}

/// GET /api/v1/sites
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Query(filter): Query<OrganizationFilter>,
) -> AppResult<Json<DataResponse<Vec<SiteResponse>>>> {
    let scope = list_scope(&user.principal, filter.organization_id)?;
    let sites = SiteRepo::list(&state.pool, scope).await?;
    Ok(Json(DataResponse {
        data: sites.iter().map(|s| s.to_response()).collect(),
    }))
}

/// GET /api/v1/sites/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<SiteDetail>> {
    let site = load_site(&state, &user.principal, id).await?;
    let checkpoints = CheckpointRepo::list_by_site(&state.pool, site.id).await?;
    Ok(Json(SiteDetail {
        site: site.to_response(),
        checkpoints: checkpoints.iter().map(|c| c.to_response()).collect(),
    }))
}

/// POST /api/v1/sites
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateSiteRequest>,
) -> AppResult<(StatusCode, Json<SiteResponse>)> {
    let organization_id = admin.principal.resolve_organization(input.organization_id)?;
    let (center_lat, center_lng) = geo_columns(input.center);

    let site = SiteRepo::create(
        &state.pool,
        &CreateSite {
            organization_id,
            name: input.name.trim().to_string(),
            image_url: input.image_url,
            center_lat,
            center_lng,
            zoom: input.zoom,
        },
    )
    .await?;

    tracing::info!(site_id = site.id, organization_id, "Site created");
    Ok((StatusCode::CREATED, Json(site.to_response())))
}

/// PUT /api/v1/sites/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateSiteRequest>,
) -> AppResult<Json<SiteResponse>> {
    load_site(&state, &admin.principal, id).await?;
    let (center_lat, center_lng) = geo_columns(input.center);

    let update = UpdateSite {
        name: input.name.map(|n| n.trim().to_string()),
        image_url: input.image_url,
        center_lat,
        center_lng,
        zoom: input.zoom,
    };
    let site = SiteRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Site", id)))?;
    Ok(Json(site.to_response()))
}

/// DELETE /api/v1/sites/{id}
///
/// Removes the site and its checkpoints. Refused with 409 once any of its
/// checkpoints has been checked in at.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_site(&state, &admin.principal, id).await?;
    if SiteRepo::has_history(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Site has monitoring history and cannot be deleted".into(),
        )));
    }
    if SiteRepo::delete(&state.pool, id).await? {
        tracing::info!(site_id = id, "Site deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Site", id)))
    }
}
