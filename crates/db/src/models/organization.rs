//! Organization (tenant) entity model and DTOs.

use patrol_core::error::CoreError;
use patrol_core::roles::AccountStatus;
use patrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Organization {
    pub fn status(&self) -> Result<AccountStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for updating an organization. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub status: Option<AccountStatus>,
}
