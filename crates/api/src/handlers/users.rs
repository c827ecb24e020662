//! Handlers for the `/users` resource: an organization's guards and
//! operators, managed by its admins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use patrol_core::error::CoreError;
use patrol_core::pagination::Page;
use patrol_core::principal::Principal;
use patrol_core::roles::{AccountStatus, Role};
use patrol_core::types::DbId;
use patrol_db::models::user::{CreateUser, UpdateUser, UserResponse};
use patrol_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::{ensure_member_role, load_member, new_password_hash};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    /// Required for a superadmin. An admin may only name their own.
    pub organization_id: Option<DbId>,
    #[validate(length(min = 1, max = 64))]
    pub login: String,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    pub password: String,
    pub role: Role,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 64))]
    pub login: Option<String>,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// Guards and operators of the organization, newest first.
pub async fn list_members(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    list_with_roles(&state, &admin.principal, &params, &[Role::Guard, Role::Operator]).await
}

/// GET /api/v1/users/guards
pub async fn list_guards(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    list_with_roles(&state, &admin.principal, &params, &[Role::Guard]).await
}

/// POST /api/v1/users
pub async fn create_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateMemberRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    ensure_member_role(input.role)?;
    let organization_id = admin.principal.resolve_organization(input.organization_id)?;
    let password_hash = new_password_hash(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            organization_id: Some(organization_id),
            login: input.login.trim().to_string(),
            username: input.username,
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        organization_id,
        role = %user.role,
        "Member created"
    );
    Ok((StatusCode::CREATED, Json(user.to_response())))
}

/// GET /api/v1/users/{id}
pub async fn get_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = load_member(&state, &admin.principal, id).await?;
    Ok(Json(user.to_response()))
}

/// PUT /api/v1/users/{id}
pub async fn update_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateMemberRequest>,
) -> AppResult<Json<UserResponse>> {
    load_member(&state, &admin.principal, id).await?;
    if let Some(role) = input.role {
        ensure_member_role(role)?;
    }
    let password_hash = input
        .password
        .as_deref()
        .map(new_password_hash)
        .transpose()?;

    let update = UpdateUser {
        login: input.login.map(|l| l.trim().to_string()),
        username: input.username,
        password_hash,
        role: input.role,
        status: input.status,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;
    Ok(Json(user.to_response()))
}

/// POST /api/v1/users/{id}/deactivate
///
/// Soft-disable the account. History is kept and the user can no longer
/// log in.
pub async fn deactivate_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_member(&state, &admin.principal, id).await?;
    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, "Member deactivated");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{id}
///
/// Refused with 409 while the user has check-in or GPS history.
pub async fn delete_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_member(&state, &admin.principal, id).await?;
    if UserRepo::has_history(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User has monitoring history; deactivate it instead".into(),
        )));
    }
    if UserRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("User", id)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn list_with_roles(
    state: &AppState,
    principal: &Principal,
    params: &PageParams,
    roles: &[Role],
) -> AppResult<Json<Page<UserResponse>>> {
    let organization_id = principal.resolve_organization(params.organization_id)?;
    let request = params.page_request();

    let users = UserRepo::list_by_organization(
        &state.pool,
        organization_id,
        roles,
        request.limit,
        request.offset(),
    )
    .await?;
    let total = UserRepo::count_by_organization(&state.pool, organization_id, roles).await?;

    let data = users.iter().map(|u| u.to_response()).collect();
    Ok(Json(Page::new(data, total, request)))
}
