//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use wishhub_core::AppError;

/// Role granted to an account on a specific wishlist.
///
/// Ordered by privilege: Owner > Editor > Reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "grant_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GrantRole {
    /// Read-only access.
    Reader,
    /// Can add and edit items.
    Editor,
    /// Full control; held implicitly by the list owner.
    Owner,
}

impl GrantRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Reader => 1,
            Self::Editor => 2,
            Self::Owner => 3,
        }
    }

    /// Check if this role grants at least the given level.
    pub fn has_at_least(&self, required: GrantRole) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Check if this role allows write operations.
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Owner | Self::Editor)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Editor => "editor",
            Self::Owner => "owner",
        }
    }
}

impl std::fmt::Display for GrantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GrantRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reader" => Ok(Self::Reader),
            "editor" => Ok(Self::Editor),
            "owner" => Ok(Self::Owner),
            _ => Err(AppError::validation(format!("Invalid grant role: '{s}'"))),
        }
    }
}

/// An explicit role assignment for one account on one wishlist.
///
/// Unique per `(wishlist_id, account_id)`; re-sharing revives a
/// previously revoked grant instead of inserting a duplicate row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: i64,
    /// The wishlist this grant is scoped to.
    pub wishlist_id: i64,
    /// The account receiving the role.
    pub account_id: i64,
    /// The granted role.
    pub role: GrantRole,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker (set on unshare).
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A grant listing row: the grant joined with the grantee's account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GrantSummary {
    /// Identifier of the underlying grant.
    pub grant_id: i64,
    /// The granted role.
    pub role: GrantRole,
    /// The grantee's account identifier.
    pub account_id: i64,
    /// The grantee's display name.
    pub account_display_name: String,
    /// The grantee's email.
    pub account_email: String,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_ordering() {
        assert!(GrantRole::Owner.has_at_least(GrantRole::Editor));
        assert!(GrantRole::Editor.has_at_least(GrantRole::Reader));
        assert!(!GrantRole::Reader.has_at_least(GrantRole::Editor));
        assert!(GrantRole::Editor.can_write());
        assert!(!GrantRole::Reader.can_write());
    }
}
