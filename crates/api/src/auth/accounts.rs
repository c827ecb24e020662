//! Account lookups backing token authentication.
//!
//! A token only proves who the caller was at login. Every request re-reads
//! the account and its organization so that deactivation takes effect
//! immediately rather than when the token expires.

use async_trait::async_trait;
use patrol_core::error::CoreError;
use patrol_core::principal::Principal;
use patrol_core::types::DbId;
use patrol_db::models::organization::Organization;
use patrol_db::models::user::User;
use patrol_db::repositories::{OrganizationRepo, UserRepo};
use patrol_db::DbPool;

use crate::error::AppError;

/// Read access to the accounts a token may refer to.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn find_organization(&self, id: DbId) -> Result<Option<Organization>, sqlx::Error>;
}

/// [`AccountDirectory`] over the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgAccountDirectory {
    pool: DbPool,
}

impl PgAccountDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_organization(&self, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        OrganizationRepo::find_by_id(&self.pool, id).await
    }
}

/// Rebuild the caller's principal from the stored account.
///
/// Role and organization come from the account row, not from the token.
/// Fails with 401 when the account is gone or inactive, or when its
/// organization is gone or inactive.
pub async fn current_principal(
    accounts: &dyn AccountDirectory,
    user_id: DbId,
) -> Result<Principal, AppError> {
    let user = accounts
        .find_user(user_id)
        .await?
        .ok_or_else(|| unauthorized("Account no longer exists"))?;

    let principal = user
        .principal()
        .map_err(|e| AppError::InternalError(format!("Corrupt account {user_id}: {e}")))?;
    if !principal.status.is_active() {
        return Err(unauthorized("Account is deactivated"));
    }

    if let Some(organization_id) = principal.organization_id {
        let organization = accounts
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| unauthorized("Organization no longer exists"))?;
        let status = organization.status().map_err(|e| {
            AppError::InternalError(format!("Corrupt organization {organization_id}: {e}"))
        })?;
        if !status.is_active() {
            tracing::debug!(user_id, organization_id, "Rejected member of inactive organization");
            return Err(unauthorized("Organization is deactivated"));
        }
    }

    Ok(principal)
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
