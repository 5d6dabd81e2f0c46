//! Friend request lifecycle and friendship queries.

use std::sync::Arc;

use tracing::info;

use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;
use wishhub_database::repositories::{AccountRepository, FriendRepository};
use wishhub_entity::friend::{FriendDecision, FriendEdge, FriendStatus, FriendSummary};

use crate::context::RequestContext;

/// Manages the friendship graph: requests, decisions, and removal.
///
/// At most one live edge exists per unordered account pair. The store
/// enforces this with a unique index, so concurrent duplicate requests
/// lose cleanly as conflicts rather than racing past a read check.
pub struct FriendGraphService {
    /// Friend edge repository.
    friend_repo: Arc<FriendRepository>,
    /// Account repository, for email lookup and liveness checks.
    account_repo: Arc<AccountRepository>,
}

impl FriendGraphService {
    /// Creates a new friend graph service.
    pub fn new(friend_repo: Arc<FriendRepository>, account_repo: Arc<AccountRepository>) -> Self {
        Self {
            friend_repo,
            account_repo,
        }
    }

    /// Whether the two accounts are currently friends.
    pub async fn are_friends(&self, a: i64, b: i64) -> AppResult<bool> {
        if a == b {
            return Ok(false);
        }
        self.friend_repo.are_friends(a, b).await
    }

    /// Lists the current account's accepted friends.
    pub async fn list_friends(&self, ctx: &RequestContext) -> AppResult<Vec<FriendSummary>> {
        self.friend_repo.list_accepted_for(ctx.account_id).await
    }

    /// Lists pending requests sent to the current account.
    pub async fn list_incoming_requests(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<FriendSummary>> {
        self.friend_repo.list_pending_incoming(ctx.account_id).await
    }

    /// Lists pending requests the current account has sent.
    pub async fn list_outgoing_requests(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<FriendSummary>> {
        self.friend_repo.list_pending_outgoing(ctx.account_id).await
    }

    /// Sends a friend request to another account by ID.
    pub async fn create_request(
        &self,
        ctx: &RequestContext,
        addressee_id: i64,
    ) -> AppResult<FriendEdge> {
        if addressee_id == ctx.account_id {
            return Err(AppError::validation("You cannot befriend yourself"));
        }

        // Soft-deleted accounts are not eligible as addressees.
        self.account_repo
            .find_by_id(addressee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        if let Some(existing) = self.friend_repo.find_pair(ctx.account_id, addressee_id).await? {
            let reason = match existing.status {
                FriendStatus::Accepted => "You are already friends",
                FriendStatus::Pending => "A friend request between you already exists",
                FriendStatus::Rejected => "A previous request between you was rejected",
            };
            return Err(AppError::conflict(reason));
        }

        let edge = self
            .friend_repo
            .insert_pending(ctx.account_id, addressee_id)
            .await?;

        info!(
            requester_id = ctx.account_id,
            addressee_id, "Friend request created"
        );
        Ok(edge)
    }

    /// Sends a friend request to an account identified by email.
    pub async fn create_request_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> AppResult<FriendEdge> {
        let addressee = self
            .account_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        self.create_request(ctx, addressee.id).await
    }

    /// Decides a pending request. Only the addressee may decide.
    pub async fn respond(
        &self,
        ctx: &RequestContext,
        edge_id: i64,
        decision: FriendDecision,
    ) -> AppResult<FriendEdge> {
        let edge = self
            .friend_repo
            .find_by_id(edge_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found"))?;

        if edge.addressee_id != ctx.account_id {
            return Err(AppError::forbidden(
                "Only the request's addressee can decide it",
            ));
        }
        if edge.status != FriendStatus::Pending {
            return Err(AppError::conflict("Friend request is already decided"));
        }

        let updated = self
            .friend_repo
            .update_status(edge.id, FriendStatus::Pending, decision.resulting_status())
            .await?;
        if !updated {
            // A concurrent decision got there first.
            return Err(AppError::conflict("Friend request is already decided"));
        }

        info!(
            edge_id,
            account_id = ctx.account_id,
            decision = ?decision,
            "Friend request decided"
        );

        self.friend_repo
            .find_by_id(edge_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found"))
    }

    /// Removes an accepted friendship. Either participant may remove it.
    pub async fn remove(&self, ctx: &RequestContext, friend_account_id: i64) -> AppResult<()> {
        let edge = self
            .friend_repo
            .find_pair(ctx.account_id, friend_account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friendship not found"))?;

        ensure_removable(&edge, ctx.account_id)?;

        self.friend_repo.soft_delete(edge.id).await?;
        info!(
            account_id = ctx.account_id,
            friend_account_id, "Friendship removed"
        );
        Ok(())
    }
}

/// Checks that an edge is an accepted friendship the given account may
/// dissolve. A live edge in another state is a conflict, not an absence.
fn ensure_removable(edge: &FriendEdge, account_id: i64) -> AppResult<()> {
    if !edge.involves(account_id) {
        return Err(AppError::forbidden("You are not part of this friendship"));
    }
    if edge.status != FriendStatus::Accepted {
        return Err(AppError::conflict("You are not friends with this account"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wishhub_core::error::ErrorKind;

    fn edge(requester: i64, addressee: i64, status: FriendStatus) -> FriendEdge {
        let now = Utc::now();
        FriendEdge {
            id: 1,
            requester_id: requester,
            addressee_id: addressee,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn removing_a_pending_edge_is_a_conflict_not_an_absence() {
        let err = ensure_removable(&edge(3, 7, FriendStatus::Pending), 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = ensure_removable(&edge(3, 7, FriendStatus::Rejected), 7).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn only_participants_can_remove_and_accepted_edges_pass() {
        let err = ensure_removable(&edge(3, 7, FriendStatus::Accepted), 9).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        assert!(ensure_removable(&edge(3, 7, FriendStatus::Accepted), 3).is_ok());
        assert!(ensure_removable(&edge(3, 7, FriendStatus::Accepted), 7).is_ok());
    }
}
