//! Startup seeding of the global superadmin.

use patrol_core::roles::Role;
use patrol_db::models::user::CreateUser;
use patrol_db::repositories::UserRepo;
use patrol_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::SuperadminSeed;
use crate::error::{AppError, AppResult};

/// Create the global superadmin from `seed` unless one already exists.
///
/// Returns `true` when an account was created. An existing superadmin is
/// left untouched, including its password.
pub async fn ensure_superadmin(pool: &DbPool, seed: &SuperadminSeed) -> AppResult<bool> {
    if let Some(existing) = UserRepo::find_global_superadmin(pool).await? {
        tracing::debug!(user_id = existing.id, "Superadmin already present");
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            organization_id: None,
            login: seed.login.clone(),
            username: Some("Superadmin".to_string()),
            password_hash,
            role: Role::Superadmin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, login = %user.login, "Superadmin created");
    Ok(true)
}
