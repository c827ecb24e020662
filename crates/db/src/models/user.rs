//! User entity model and DTOs.

use patrol_core::error::CoreError;
use patrol_core::principal::Principal;
use patrol_core::roles::{AccountStatus, Role};
use patrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub organization_id: Option<DbId>,
    pub login: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }

    pub fn status(&self) -> Result<AccountStatus, CoreError> {
        self.status.parse()
    }

    /// The principal this account acts as once authenticated.
    pub fn principal(&self) -> Result<Principal, CoreError> {
        Ok(Principal {
            user_id: self.id,
            organization_id: self.organization_id,
            role: self.role()?,
            status: self.status()?,
        })
    }

    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            organization_id: self.organization_id,
            login: self.login.clone(),
            username: self.username.clone(),
            role: self.role.clone(),
            status: self.status.clone(),
            created_at: self.created_at,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub organization_id: Option<DbId>,
    pub login: String,
    pub username: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub organization_id: Option<DbId>,
    pub login: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub login: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}
