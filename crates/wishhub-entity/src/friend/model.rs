//! Friend edge entity model.
//!
//! A friend edge is an undirected relation over an unordered account
//! pair, with a directed pending sub-state: the requester initiates, the
//! addressee decides. At most one non-deleted edge may exist per pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use wishhub_core::AppError;

/// Lifecycle status of a friend edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "friend_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    /// Request sent, awaiting the addressee's decision.
    Pending,
    /// Request accepted; the two accounts are friends.
    Accepted,
    /// Request rejected by the addressee.
    Rejected,
}

impl FriendStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for FriendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FriendStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::validation(format!(
                "Invalid friend status: '{s}'"
            ))),
        }
    }
}

/// The addressee's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendDecision {
    /// Accept the request.
    Accept,
    /// Reject the request.
    Reject,
}

impl FriendDecision {
    /// The status a pending edge transitions to under this decision.
    pub fn resulting_status(&self) -> FriendStatus {
        match self {
            Self::Accept => FriendStatus::Accepted,
            Self::Reject => FriendStatus::Rejected,
        }
    }
}

/// A friendship edge between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendEdge {
    /// Unique edge identifier.
    pub id: i64,
    /// Account that initiated the request.
    pub requester_id: i64,
    /// Account the request was sent to.
    pub addressee_id: i64,
    /// Current edge status.
    pub status: FriendStatus,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
    /// When the edge was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker (set on unfriend).
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FriendEdge {
    /// Whether the given account is one of the two participants.
    pub fn involves(&self, account_id: i64) -> bool {
        self.requester_id == account_id || self.addressee_id == account_id
    }

    /// The participant on the other side of the edge.
    ///
    /// Returns `None` if the given account is not a participant.
    pub fn counterpart(&self, account_id: i64) -> Option<i64> {
        if self.requester_id == account_id {
            Some(self.addressee_id)
        } else if self.addressee_id == account_id {
            Some(self.requester_id)
        } else {
            None
        }
    }
}

/// A friend listing row: the edge joined with the counterpart account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendSummary {
    /// Identifier of the underlying edge.
    pub edge_id: i64,
    /// Current edge status.
    pub status: FriendStatus,
    /// The other account's identifier.
    pub friend_id: i64,
    /// The other account's display name.
    pub friend_display_name: String,
    /// The other account's photo, if set.
    pub friend_photo_url: Option<String>,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(requester: i64, addressee: i64, status: FriendStatus) -> FriendEdge {
        FriendEdge {
            id: 1,
            requester_id: requester,
            addressee_id: addressee,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn counterpart_resolves_both_directions() {
        let e = edge(3, 7, FriendStatus::Accepted);
        assert_eq!(e.counterpart(3), Some(7));
        assert_eq!(e.counterpart(7), Some(3));
        assert_eq!(e.counterpart(9), None);
    }

    #[test]
    fn decision_maps_to_status() {
        assert_eq!(
            FriendDecision::Accept.resulting_status(),
            FriendStatus::Accepted
        );
        assert_eq!(
            FriendDecision::Reject.resulting_status(),
            FriendStatus::Rejected
        );
    }
}
