//! Route definitions for the `/superadmin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::superadmin;
use crate::state::AppState;

/// Routes mounted at `/superadmin`.
///
/// All routes require `SUPERADMIN` (enforced by handler extractors).
///
/// ```text
/// GET    /organizations              -> list_organizations
/// POST   /organizations              -> create_organization
/// PUT    /organizations/{id}         -> update_organization
/// DELETE /organizations/{id}         -> delete_organization
/// PUT    /organizations/{id}/status  -> set_organization_status
/// GET    /admins                     -> list_admins
/// POST   /admins                     -> create_admin
/// PUT    /admins/{id}                -> update_admin
/// DELETE /admins/{id}                -> delete_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations",
            get(superadmin::list_organizations).post(superadmin::create_organization),
        )
        .route(
            "/organizations/{id}",
            put(superadmin::update_organization).delete(superadmin::delete_organization),
        )
        .route(
            "/organizations/{id}/status",
            put(superadmin::set_organization_status),
        )
        .route(
            "/admins",
            get(superadmin::list_admins).post(superadmin::create_admin),
        )
        .route(
            "/admins/{id}",
            put(superadmin::update_admin).delete(superadmin::delete_admin),
        )
}
