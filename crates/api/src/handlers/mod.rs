//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `patrol_monitor` for check-ins and to the
//! repositories in `patrol_db` for everything else, and map errors via
//! [`AppError`].
//!
//! The loaders below are the single place where tenancy is enforced for
//! scoped resources: a record is resolved to its owning organization and
//! the caller must be allowed into it.

pub mod auth;
pub mod checkin;
pub mod checkpoints;
pub mod gps;
pub mod logs;
pub mod sites;
pub mod superadmin;
pub mod users;

use patrol_core::error::CoreError;
use patrol_core::principal::Principal;
use patrol_core::roles::Role;
use patrol_core::types::DbId;
use patrol_db::models::checkpoint::ScopedCheckpoint;
use patrol_db::models::site::Site;
use patrol_db::models::user::User;
use patrol_db::repositories::{CheckpointRepo, SiteRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a site the caller may access.
pub(crate) async fn load_site(
    state: &AppState,
    principal: &Principal,
    site_id: DbId,
) -> AppResult<Site> {
    let site = SiteRepo::find_by_id(&state.pool, site_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Site", site_id)))?;
    principal.ensure_access(site.organization_id)?;
    Ok(site)
}

/// Load a checkpoint the caller may access, with its organization.
pub(crate) async fn load_checkpoint(
    state: &AppState,
    principal: &Principal,
    checkpoint_id: DbId,
) -> AppResult<ScopedCheckpoint> {
    let checkpoint = CheckpointRepo::find_by_id(&state.pool, checkpoint_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Checkpoint", checkpoint_id)))?;
    principal.ensure_access(checkpoint.organization_id)?;
    Ok(checkpoint)
}

/// Load a guard or operator of an organization the caller may access.
///
/// Admin and superadmin accounts are not reachable through member routes.
pub(crate) async fn load_member(
    state: &AppState,
    principal: &Principal,
    user_id: DbId,
) -> AppResult<User> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;
    let organization_id = user
        .organization_id
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;
    principal.ensure_access(organization_id)?;
    ensure_member_role(user.role()?)?;
    Ok(user)
}

/// Members managed by an organization's admin are guards and operators.
pub(crate) fn ensure_member_role(role: Role) -> Result<(), CoreError> {
    match role {
        Role::Guard | Role::Operator => Ok(()),
        other => Err(CoreError::InvalidRole(format!(
            "{other} accounts cannot be managed here; expected GUARD or OPERATOR"
        ))),
    }
}

/// Organization filter for listings: a superadmin may see everything or
/// narrow to one organization, anyone else sees only their own.
pub(crate) fn list_scope(
    principal: &Principal,
    requested: Option<DbId>,
) -> Result<Option<DbId>, CoreError> {
    if principal.is_superadmin() {
        return Ok(requested);
    }
    principal.resolve_organization(requested).map(Some)
}

/// Check strength and hash a new password.
pub(crate) fn new_password_hash(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}
