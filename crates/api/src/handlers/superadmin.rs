//! Handlers for the `/superadmin` resource: tenants and their admins.
//!
//! All handlers require the `SUPERADMIN` role via [`RequireSuperadmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use patrol_core::error::CoreError;
use patrol_core::pagination::Page;
use patrol_core::roles::{AccountStatus, Role};
use patrol_core::types::DbId;
use patrol_db::models::organization::{Organization, UpdateOrganization};
use patrol_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use patrol_db::repositories::{OrganizationRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::new_password_hash;
use crate::middleware::rbac::RequireSuperadmin;
use crate::query::PageParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationStatusRequest {
    pub status: AccountStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub organization_id: DbId,
    #[validate(length(min = 1, max = 64))]
    pub login: String,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, max = 64))]
    pub login: Option<String>,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    pub password: Option<String>,
    pub status: Option<AccountStatus>,
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

/// GET /api/v1/superadmin/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<Organization>>> {
    let request = params.page_request();
    let rows = OrganizationRepo::list_page(&state.pool, request.limit, request.offset()).await?;
    let total = OrganizationRepo::count(&state.pool).await?;
    Ok(Json(Page::new(rows, total, request)))
}

/// POST /api/v1/superadmin/organizations
///
/// Names are unique; a duplicate is a 409 from `uq_organizations_name`.
pub async fn create_organization(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    ValidatedJson(input): ValidatedJson<CreateOrganizationRequest>,
) -> AppResult<(StatusCode, Json<Organization>)> {
    let organization = OrganizationRepo::create(&state.pool, input.name.trim()).await?;
    tracing::info!(organization_id = organization.id, "Organization created");
    Ok((StatusCode::CREATED, Json(organization)))
}

/// PUT /api/v1/superadmin/organizations/{id}
pub async fn update_organization(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateOrganizationRequest>,
) -> AppResult<Json<Organization>> {
    let update = UpdateOrganization {
        name: input.name.map(|n| n.trim().to_string()),
        status: input.status,
    };
    apply_organization_update(&state, id, &update).await
}

/// PUT /api/v1/superadmin/organizations/{id}/status
///
/// Deactivating an organization blocks every member login.
pub async fn set_organization_status(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Path(id): Path<DbId>,
    Json(input): Json<OrganizationStatusRequest>,
) -> AppResult<Json<Organization>> {
    let update = UpdateOrganization {
        status: Some(input.status),
        ..Default::default()
    };
    let organization = apply_organization_update(&state, id, &update).await?;
    tracing::info!(organization_id = id, status = %input.status, "Organization status changed");
    Ok(organization)
}

/// DELETE /api/v1/superadmin/organizations/{id}
///
/// Refused with 409 while the organization still has users or sites.
pub async fn delete_organization(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if OrganizationRepo::has_dependents(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Organization still has users or sites".into(),
        )));
    }
    if OrganizationRepo::delete(&state.pool, id).await? {
        tracing::info!(organization_id = id, "Organization deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Organization", id)))
    }
}

// ---------------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------------

/// GET /api/v1/superadmin/admins
pub async fn list_admins(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let request = params.page_request();
    let rows =
        UserRepo::list_by_role(&state.pool, Role::Admin, request.limit, request.offset()).await?;
    let total = UserRepo::count_by_role(&state.pool, Role::Admin).await?;
    let data = rows.iter().map(|u| u.to_response()).collect();
    Ok(Json(Page::new(data, total, request)))
}

/// POST /api/v1/superadmin/admins
pub async fn create_admin(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    ValidatedJson(input): ValidatedJson<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    OrganizationRepo::find_by_id(&state.pool, input.organization_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Organization", input.organization_id)))?;
    let password_hash = new_password_hash(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            organization_id: Some(input.organization_id),
            login: input.login.trim().to_string(),
            username: input.username,
            password_hash,
            role: Role::Admin,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        organization_id = input.organization_id,
        "Admin created"
    );
    Ok((StatusCode::CREATED, Json(user.to_response())))
}

/// PUT /api/v1/superadmin/admins/{id}
pub async fn update_admin(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateAdminRequest>,
) -> AppResult<Json<UserResponse>> {
    load_admin(&state, id).await?;
    let password_hash = input
        .password
        .as_deref()
        .map(new_password_hash)
        .transpose()?;

    let update = UpdateUser {
        login: input.login.map(|l| l.trim().to_string()),
        username: input.username,
        password_hash,
        role: None,
        status: input.status,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Admin", id)))?;
    Ok(Json(user.to_response()))
}

/// DELETE /api/v1/superadmin/admins/{id}
pub async fn delete_admin(
    State(state): State<AppState>,
    RequireSuperadmin(_sa): RequireSuperadmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_admin(&state, id).await?;
    if UserRepo::has_history(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Admin has monitoring history; deactivate it instead".into(),
        )));
    }
    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, "Admin deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Admin", id)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn apply_organization_update(
    state: &AppState,
    id: DbId,
    update: &UpdateOrganization,
) -> AppResult<Json<Organization>> {
    let organization = OrganizationRepo::update(&state.pool, id, update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Organization", id)))?;
    Ok(Json(organization))
}

/// Only `ADMIN` accounts are reachable through `/superadmin/admins/{id}`.
async fn load_admin(state: &AppState, id: DbId) -> AppResult<User> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|u| u.role().is_ok_and(|r| r == Role::Admin))
        .ok_or(AppError::Core(CoreError::not_found("Admin", id)))?;
    Ok(user)
}
