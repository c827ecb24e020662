//! The authenticated caller of a domain operation.

use crate::error::CoreError;
use crate::roles::{AccountStatus, Role};
use crate::types::DbId;

/// Who is performing an operation, as established by token verification.
///
/// Built once at the transport edge and passed by value into every core
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    /// `None` only for the global superadmin.
    pub organization_id: Option<DbId>,
    pub role: Role,
    pub status: AccountStatus,
}

impl Principal {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    /// Whether this principal may touch data owned by `organization_id`.
    pub fn can_access(&self, organization_id: DbId) -> bool {
        self.is_superadmin() || self.organization_id == Some(organization_id)
    }

    /// Fail with `CrossTenant` unless [`can_access`](Self::can_access) holds.
    pub fn ensure_access(&self, organization_id: DbId) -> Result<(), CoreError> {
        if self.can_access(organization_id) {
            Ok(())
        } else {
            Err(CoreError::CrossTenant(format!(
                "organization {organization_id} is not accessible"
            )))
        }
    }

    /// The organization a non-superadmin principal is bound to.
    pub fn require_organization(&self) -> Result<DbId, CoreError> {
        self.organization_id.ok_or_else(|| {
            CoreError::Validation("an organization must be specified".into())
        })
    }

    /// Pick the organization a request acts on.
    ///
    /// A superadmin must name one. Anyone else acts on their own and may only
    /// name that one.
    pub fn resolve_organization(&self, requested: Option<DbId>) -> Result<DbId, CoreError> {
        match requested {
            Some(organization_id) => {
                self.ensure_access(organization_id)?;
                Ok(organization_id)
            }
            None => self.require_organization(),
        }
    }
}
