//! Read-only views over the monitoring ledger.

use axum::extract::{Query, State};
use axum::Json;
use patrol_core::pagination::Page;
use patrol_db::models::monitoring_log::{GuardPosition, MonitoringLogDetail};
use patrol_db::repositories::MonitoringLogRepo;

use crate::error::AppResult;
use crate::handlers::load_site;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::query::{OrganizationFilter, SiteLogParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/logs?siteId=&page=&limit=
///
/// The current state of each checkpoint of a site: its latest log only.
pub async fn latest(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Query(params): Query<SiteLogParams>,
) -> AppResult<Json<Page<MonitoringLogDetail>>> {
    let site = load_site(&state, &user.principal, params.site_id).await?;
    let request = params.page_request();

    let rows =
        MonitoringLogRepo::list_latest_by_site(&state.pool, site.id, request.limit, request.offset())
            .await?;
    let total = MonitoringLogRepo::count_latest_by_site(&state.pool, site.id).await?;

    Ok(Json(Page::new(rows, total, request)))
}

/// GET /api/v1/logs/history?siteId=&page=&limit=
///
/// Every log of a site, newest first.
pub async fn history(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(params): Query<SiteLogParams>,
) -> AppResult<Json<Page<MonitoringLogDetail>>> {
    let site = load_site(&state, &user.principal, params.site_id).await?;
    let request = params.page_request();

    let rows = MonitoringLogRepo::list_history_by_site(
        &state.pool,
        site.id,
        request.limit,
        request.offset(),
    )
    .await?;
    let total = MonitoringLogRepo::count_history_by_site(&state.pool, site.id).await?;

    Ok(Json(Page::new(rows, total, request)))
}

/// GET /api/v1/guards/positions
///
/// The checkpoint each guard of the organization last checked in at.
pub async fn guard_positions(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Query(filter): Query<OrganizationFilter>,
) -> AppResult<Json<DataResponse<Vec<GuardPosition>>>> {
    let organization_id = user.principal.resolve_organization(filter.organization_id)?;
    let positions = MonitoringLogRepo::list_guard_positions(&state.pool, organization_id).await?;
    Ok(Json(DataResponse { data: positions }))
}
