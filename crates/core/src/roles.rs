//! Well-known role and account status names.
//!
//! These must match the `CHECK` constraints in
//! `20260301000002_create_users_table.sql` and
//! `20260301000001_create_organizations_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_SUPERADMIN: &str = "SUPERADMIN";
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_OPERATOR: &str = "OPERATOR";
pub const ROLE_GUARD: &str = "GUARD";

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_INACTIVE: &str = "INACTIVE";

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Superadmin,
    Admin,
    Operator,
    Guard,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => ROLE_SUPERADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Operator => ROLE_OPERATOR,
            Role::Guard => ROLE_GUARD,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SUPERADMIN => Ok(Role::Superadmin),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_OPERATOR => Ok(Role::Operator),
            ROLE_GUARD => Ok(Role::Guard),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// Soft-enable flag shared by users and organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => STATUS_ACTIVE,
            AccountStatus::Inactive => STATUS_INACTIVE,
        }
    }

    pub fn is_active(self) -> bool {
        self == AccountStatus::Active
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_ACTIVE => Ok(AccountStatus::Active),
            STATUS_INACTIVE => Ok(AccountStatus::Inactive),
            other => Err(CoreError::Validation(format!("Unknown status '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Superadmin, Role::Admin, Role::Operator, Role::Guard] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_validation_error() {
        let err = "guard".parse::<Role>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn role_serializes_uppercase() {
        let json = serde_json::to_string(&Role::Operator).unwrap();
        assert_eq!(json, "\"OPERATOR\"");
    }

    #[test]
    fn inactive_status_is_not_active() {
        assert!(AccountStatus::Active.is_active());
        assert!(!"INACTIVE".parse::<AccountStatus>().unwrap().is_active());
    }
}
