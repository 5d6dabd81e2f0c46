//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::permission::GrantRole;

/// An anonymous, token-bearing capability granting read-only access to
/// one wishlist's non-private items.
///
/// The token is 32 random bytes rendered as 64 lowercase hex characters.
/// Revocation, expiry, and soft deletion each independently invalidate
/// the link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique link identifier.
    pub id: i64,
    /// The wishlist this link exposes.
    pub wishlist_id: i64,
    /// High-entropy lookup token (64 lowercase hex chars).
    pub token: String,
    /// Role conveyed by the link; always `reader`.
    pub role: GrantRole,
    /// When the link stops working (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// When the link was revoked by the owner (None = still live).
    pub revoked_at: Option<DateTime<Utc>>,
    /// Account that issued the link.
    pub created_by: i64,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the link was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    /// Check whether the link grants access at the given instant.
    ///
    /// All three gates apply independently; callers must not reveal
    /// which one failed.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        if self.revoked_at.is_some() {
            return false;
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link() -> ShareLink {
        let now = Utc::now();
        ShareLink {
            id: 1,
            wishlist_id: 10,
            token: "ab".repeat(32),
            role: GrantRole::Reader,
            expires_at: None,
            revoked_at: None,
            created_by: 5,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn fresh_link_is_valid() {
        assert!(link().is_valid_at(Utc::now()));
    }

    #[test]
    fn each_gate_invalidates_independently() {
        let now = Utc::now();

        let mut revoked = link();
        revoked.revoked_at = Some(now);
        assert!(!revoked.is_valid_at(now));

        let mut expired = link();
        expired.expires_at = Some(now - Duration::seconds(1));
        assert!(!expired.is_valid_at(now));

        let mut deleted = link();
        deleted.deleted_at = Some(now);
        assert!(!deleted.is_valid_at(now));
    }

    #[test]
    fn future_expiry_is_still_valid() {
        let now = Utc::now();
        let mut l = link();
        l.expires_at = Some(now + Duration::hours(1));
        assert!(l.is_valid_at(now));
    }
}
