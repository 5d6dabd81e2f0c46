//! Wishlist CRUD gated by the access resolver.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_database::repositories::{
    GrantRepository, ItemRepository, ShareLinkRepository, WishlistRepository,
};
use wishhub_entity::permission::GrantRole;
use wishhub_entity::wishlist::{
    CreateWishlist, SharedWishlist, UpdateWishlist, Wishlist, WishlistItem,
};

use crate::access::AccessControlResolver;
use crate::context::RequestContext;

/// A wishlist together with the viewer's effective role and the items
/// the viewer may see.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WishlistView {
    /// The wishlist.
    pub wishlist: Wishlist,
    /// The viewer's held role, if any. Viewers who reach the list
    /// through its visibility alone see it role-less.
    pub role: Option<GrantRole>,
    /// The items visible to this viewer.
    pub items: Vec<WishlistItem>,
}

/// The three listing perspectives an account sees at once.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WishlistOverview {
    /// Lists the account owns.
    pub mine: Vec<Wishlist>,
    /// Lists shared with the account via an explicit grant.
    pub shared_with_me: Vec<SharedWishlist>,
    /// Other accounts' lists visible by being public or friends-visible.
    pub discoverable: Vec<Wishlist>,
}

/// Manages wishlist creation, retrieval, update, and deletion.
pub struct WishlistService {
    /// Shared connection pool for the delete cascade transaction.
    pool: PgPool,
    /// Wishlist repository.
    wishlist_repo: Arc<WishlistRepository>,
    /// Item repository.
    item_repo: Arc<ItemRepository>,
    /// Grant repository.
    grant_repo: Arc<GrantRepository>,
    /// Share link repository.
    link_repo: Arc<ShareLinkRepository>,
    /// Access resolver.
    resolver: Arc<AccessControlResolver>,
}

impl WishlistService {
    /// Creates a new wishlist service.
    pub fn new(
        pool: PgPool,
        wishlist_repo: Arc<WishlistRepository>,
        item_repo: Arc<ItemRepository>,
        grant_repo: Arc<GrantRepository>,
        link_repo: Arc<ShareLinkRepository>,
        resolver: Arc<AccessControlResolver>,
    ) -> Self {
        Self {
            pool,
            wishlist_repo,
            item_repo,
            grant_repo,
            link_repo,
            resolver,
        }
    }

    /// Creates a wishlist owned by the current account.
    pub async fn create(&self, ctx: &RequestContext, data: CreateWishlist) -> AppResult<Wishlist> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }

        let wishlist = self.wishlist_repo.create(ctx.account_id, &data).await?;

        // The owner also carries an explicit owner grant so grant
        // listings show every participant, the owner included.
        self.grant_repo
            .upsert(wishlist.id, ctx.account_id, GrantRole::Owner)
            .await?;

        info!(
            account_id = ctx.account_id,
            wishlist_id = wishlist.id,
            "Wishlist created"
        );
        Ok(wishlist)
    }

    /// Gets a wishlist with the items the viewer may see.
    pub async fn get(&self, ctx: &RequestContext, wishlist_id: i64) -> AppResult<WishlistView> {
        let (wishlist, decision) = self.resolver.require_view(ctx, wishlist_id).await?;
        let role = decision.effective_role();

        let items = self
            .item_repo
            .list_for_wishlist(wishlist.id, decision.is_owner)
            .await?;

        Ok(WishlistView {
            wishlist,
            role,
            items,
        })
    }

    /// Updates a wishlist's own fields. Requires edit access.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
        update: UpdateWishlist,
    ) -> AppResult<Wishlist> {
        if update.is_empty() {
            return Err(AppError::validation("No changes supplied"));
        }

        let (mut wishlist, _) = self.resolver.require_edit(ctx, wishlist_id).await?;

        if let Some(title) = update.title {
            let trimmed = title.trim().to_string();
            if trimmed.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
            wishlist.title = trimmed;
        }
        if let Some(description) = update.description {
            wishlist.description = description;
        }
        if let Some(visibility) = update.visibility {
            wishlist.visibility = visibility;
        }

        self.wishlist_repo.update(&wishlist).await?;

        info!(
            account_id = ctx.account_id,
            wishlist_id, "Wishlist updated"
        );
        Ok(wishlist)
    }

    /// Deletes a wishlist. Owner-only; the list, its items, its grants,
    /// and its share links are soft-deleted in one transaction.
    pub async fn delete(&self, ctx: &RequestContext, wishlist_id: i64) -> AppResult<()> {
        let (wishlist, decision) = self.resolver.require_view(ctx, wishlist_id).await?;
        if !decision.is_owner {
            return Err(AppError::forbidden("Only the owner can delete a wishlist"));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        self.item_repo
            .soft_delete_for_wishlist(&mut *tx, wishlist.id)
            .await?;
        self.grant_repo
            .soft_delete_for_wishlist(&mut *tx, wishlist.id)
            .await?;
        self.link_repo
            .soft_delete_for_wishlist(&mut *tx, wishlist.id)
            .await?;
        self.wishlist_repo.soft_delete(&mut *tx, wishlist.id).await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit wishlist deletion", e)
        })?;

        info!(
            account_id = ctx.account_id,
            wishlist_id, "Wishlist deleted"
        );
        Ok(())
    }

    /// Lists everything the current account can reach, in three groups.
    ///
    /// Lists the account holds a grant on are excluded from the
    /// discoverable group by the repository query, so no list appears
    /// twice.
    pub async fn overview(&self, ctx: &RequestContext) -> AppResult<WishlistOverview> {
        let mine = self.wishlist_repo.list_owned_by(ctx.account_id).await?;
        let shared_with_me: Vec<SharedWishlist> = self
            .wishlist_repo
            .list_shared_with(ctx.account_id)
            .await?
            .into_iter()
            .filter(|w| w.role != GrantRole::Owner)
            .collect();
        let discoverable = self.wishlist_repo.list_visible_to(ctx.account_id).await?;

        Ok(WishlistOverview {
            mine,
            shared_with_me,
            discoverable,
        })
    }
}
