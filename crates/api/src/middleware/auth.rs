//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use patrol_core::error::CoreError;
use patrol_core::principal::Principal;

use crate::auth::accounts::current_principal;
use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the `Authorization` header.
///
/// The principal is rebuilt from the stored account on every request, so a
/// deactivated user or organization loses access before the token expires.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.principal.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub principal: Principal,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claimed = authenticate(token, &state.config.jwt)?;
        let principal = current_principal(state.accounts.as_ref(), claimed.user_id).await?;
        Ok(AuthUser { principal })
    }
}

/// Verify `token` and decode the principal it was issued for.
///
/// This only checks the signature, expiry and claims. Callers pass the
/// result's `user_id` to [`current_principal`] for the account's live state.
pub fn authenticate(token: &str, config: &JwtConfig) -> Result<Principal, AppError> {
    let claims = validate_token(token, config).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;
    let principal = claims
        .principal()
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Malformed token claims".into())))?;
    if !principal.status.is_active() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account is deactivated".into(),
        )));
    }
    Ok(principal)
}

/// The Bearer token from an `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
