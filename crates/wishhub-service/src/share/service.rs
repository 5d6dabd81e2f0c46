//! Share administration: grants and links, owner-gated.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;
use wishhub_database::repositories::{AccountRepository, GrantRepository, ShareLinkRepository};
use wishhub_entity::permission::{GrantRole, GrantSummary, PermissionGrant};
use wishhub_entity::share::ShareLink;

use super::token::TokenGenerator;
use crate::access::AccessControlResolver;
use crate::context::RequestContext;

/// Request to create a share link.
///
/// Links always confer the reader role; callers only choose the expiry.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CreateLinkRequest {
    /// Expiration time (optional, None = never).
    pub expires_at: Option<DateTime<Utc>>,
}

/// Manages per-account grants and anonymous links for a wishlist.
///
/// Every operation here is gated on share-management access, which the
/// resolver restricts to the list owner.
pub struct ShareLinkManager {
    /// Grant repository.
    grant_repo: Arc<GrantRepository>,
    /// Share link repository.
    link_repo: Arc<ShareLinkRepository>,
    /// Account repository, for grantee email lookup.
    account_repo: Arc<AccountRepository>,
    /// Access resolver.
    resolver: Arc<AccessControlResolver>,
    /// Token generator.
    tokens: Arc<TokenGenerator>,
}

impl ShareLinkManager {
    /// Creates a new share link manager.
    pub fn new(
        grant_repo: Arc<GrantRepository>,
        link_repo: Arc<ShareLinkRepository>,
        account_repo: Arc<AccountRepository>,
        resolver: Arc<AccessControlResolver>,
        tokens: Arc<TokenGenerator>,
    ) -> Self {
        Self {
            grant_repo,
            link_repo,
            account_repo,
            resolver,
            tokens,
        }
    }

    /// Grants a role on a wishlist to another account by email.
    ///
    /// Re-sharing with an account whose grant was revoked revives the
    /// old grant with the new role.
    pub async fn grant_by_email(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
        email: &str,
        role: GrantRole,
    ) -> AppResult<PermissionGrant> {
        if role == GrantRole::Owner {
            return Err(AppError::validation("Ownership cannot be granted"));
        }

        let (wishlist, _) = self
            .resolver
            .require_manage_shares(ctx, wishlist_id)
            .await?;

        let grantee = self
            .account_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        if grantee.id == ctx.account_id {
            return Err(AppError::validation("You already own this wishlist"));
        }

        let grant = self.grant_repo.upsert(wishlist.id, grantee.id, role).await?;
        info!(
            account_id = ctx.account_id,
            wishlist_id,
            grantee_id = grantee.id,
            role = %role,
            "Grant issued"
        );
        Ok(grant)
    }

    /// Revokes another account's grant on a wishlist.
    pub async fn revoke_grant(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
        account_id: i64,
    ) -> AppResult<()> {
        let (wishlist, _) = self
            .resolver
            .require_manage_shares(ctx, wishlist_id)
            .await?;

        if account_id == ctx.account_id {
            return Err(AppError::validation(
                "The owner's own grant cannot be revoked",
            ));
        }

        let revoked = self.grant_repo.revoke(wishlist.id, account_id).await?;
        if !revoked {
            return Err(AppError::not_found("Grant not found"));
        }

        info!(
            account_id = ctx.account_id,
            wishlist_id,
            grantee_id = account_id,
            "Grant revoked"
        );
        Ok(())
    }

    /// Lists a wishlist's grants with grantee account details.
    pub async fn list_grants(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
    ) -> AppResult<Vec<GrantSummary>> {
        let (wishlist, _) = self
            .resolver
            .require_manage_shares(ctx, wishlist_id)
            .await?;
        self.grant_repo.list_for_wishlist(wishlist.id).await
    }

    /// Creates an anonymous share link for a wishlist. The link always
    /// carries the reader role.
    pub async fn create_link(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
        req: CreateLinkRequest,
    ) -> AppResult<ShareLink> {
        if let Some(expires_at) = req.expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::validation("Expiration must be in the future"));
            }
        }

        let (wishlist, _) = self
            .resolver
            .require_manage_shares(ctx, wishlist_id)
            .await?;

        let token = self.tokens.generate();
        let link = self
            .link_repo
            .create(
                wishlist.id,
                &token,
                GrantRole::Reader,
                req.expires_at,
                ctx.account_id,
            )
            .await?;

        info!(
            account_id = ctx.account_id,
            wishlist_id,
            link_id = link.id,
            "Share link created"
        );
        Ok(link)
    }

    /// Lists a wishlist's share links.
    pub async fn list_links(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
    ) -> AppResult<Vec<ShareLink>> {
        let (wishlist, _) = self
            .resolver
            .require_manage_shares(ctx, wishlist_id)
            .await?;
        self.link_repo.list_for_wishlist(wishlist.id).await
    }

    /// Revokes a share link. Revoking an already revoked link is a
    /// no-op that keeps the original revocation time.
    pub async fn revoke_link(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
        link_id: i64,
    ) -> AppResult<()> {
        let (wishlist, _) = self
            .resolver
            .require_manage_shares(ctx, wishlist_id)
            .await?;

        let revoked = self.link_repo.revoke(link_id, wishlist.id).await?;
        if !revoked {
            return Err(AppError::not_found("Share link not found"));
        }

        info!(
            account_id = ctx.account_id,
            wishlist_id, link_id, "Share link revoked"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_requests_cannot_carry_a_role() {
        // A caller-supplied role is ignored on deserialization; the
        // request only carries an expiry, and the stored role is always
        // reader.
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"role":"editor","expires_at":null}"#).unwrap();
        assert!(req.expires_at.is_none());
    }
}
