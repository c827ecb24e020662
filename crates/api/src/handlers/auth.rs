//! Handlers for the `/auth` resource (dashboard and guard login).

use axum::extract::State;
use axum::Json;
use patrol_core::error::CoreError;
use patrol_core::roles::Role;
use patrol_core::types::DbId;
use patrol_db::models::user::{User, UserResponse};
use patrol_db::repositories::{OrganizationRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login` and `POST /auth/guard`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub login: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful dashboard login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Successful guard login, in the shape the guard app expects.
#[derive(Debug, Serialize)]
pub struct GuardLoginResponse {
    pub id: DbId,
    pub login: String,
    pub username: Option<String>,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate any role with login + password.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = verify_credentials(&state, &input).await?;
    let access_token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.to_response(),
    }))
}

/// POST /api/v1/auth/guard
///
/// Authenticate a guard device. Non-guard accounts are refused.
pub async fn guard_login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<GuardLoginResponse>> {
    let user = verify_credentials(&state, &input).await?;
    if user.role()? != Role::Guard {
        return Err(AppError::Core(CoreError::InvalidRole(
            "Only guards can log in here".into(),
        )));
    }
    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, "Guard logged in");

    Ok(Json(GuardLoginResponse {
        id: user.id,
        login: user.login,
        username: user.username,
        token,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Check the password, then the account and its organization are active.
async fn verify_credentials(state: &AppState, input: &LoginRequest) -> AppResult<User> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid login or password".into(),
        ))
    };

    let user = UserRepo::find_by_login(&state.pool, input.login.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    if !user.status()?.is_active() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(organization_id) = user.organization_id {
        let organization = OrganizationRepo::find_by_id(&state.pool, organization_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Organization", organization_id)))?;
        if !organization.status()?.is_active() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Organization is deactivated".into(),
            )));
        }
    }

    Ok(user)
}

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    let principal = user.principal()?;
    generate_access_token(&principal, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}
