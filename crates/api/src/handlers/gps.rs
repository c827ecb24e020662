//! Handlers for the `/gps` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use patrol_core::geo::GeoPoint;
use patrol_core::pagination::{clamp_limit, DEFAULT_TRAIL_LIMIT, MAX_TRAIL_LIMIT};
use patrol_core::types::DbId;
use patrol_db::models::gps_log::GpsLogResponse;
use patrol_db::repositories::GpsLogRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::handlers::load_member;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::query::{OrganizationFilter, TrailParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /gps`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GpsPingRequest {
    #[validate(range(min = 1))]
    pub user_id: DbId,
    #[validate(nested)]
    pub location: GeoPoint,
}

/// POST /api/v1/gps
pub async fn record(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<GpsPingRequest>,
) -> AppResult<(StatusCode, Json<GpsLogResponse>)> {
    let ping = state
        .gps
        .record(&auth.principal, input.user_id, input.location, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(ping)))
}

/// GET /api/v1/gps/latest
///
/// Latest ping of every guard in the caller's organization.
pub async fn latest(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Query(filter): Query<OrganizationFilter>,
) -> AppResult<Json<DataResponse<Vec<GpsLogResponse>>>> {
    let organization_id = user.principal.resolve_organization(filter.organization_id)?;
    let pings = GpsLogRepo::list_latest_by_organization(&state.pool, organization_id).await?;
    Ok(Json(DataResponse {
        data: pings.iter().map(|p| p.to_response()).collect(),
    }))
}

/// GET /api/v1/gps/{user_id}
///
/// A guard's trail, newest first.
pub async fn trail(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(user_id): Path<DbId>,
    Query(params): Query<TrailParams>,
) -> AppResult<Json<DataResponse<Vec<GpsLogResponse>>>> {
    let guard = load_member(&state, &user.principal, user_id).await?;
    let limit = clamp_limit(params.limit, DEFAULT_TRAIL_LIMIT, MAX_TRAIL_LIMIT);
    let pings = GpsLogRepo::list_trail(&state.pool, guard.id, limit).await?;
    Ok(Json(DataResponse {
        data: pings.iter().map(|p| p.to_response()).collect(),
    }))
}
