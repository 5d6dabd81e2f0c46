//! Wishlist item CRUD gated by the access resolver.

use std::sync::Arc;

use tracing::info;

use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;
use wishhub_database::repositories::ItemRepository;
use wishhub_entity::wishlist::{CreateItem, UpdateItem, WishlistItem};

use crate::access::AccessControlResolver;
use crate::context::RequestContext;

/// Manages items within a wishlist.
pub struct ItemService {
    /// Item repository.
    item_repo: Arc<ItemRepository>,
    /// Access resolver.
    resolver: Arc<AccessControlResolver>,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(item_repo: Arc<ItemRepository>, resolver: Arc<AccessControlResolver>) -> Self {
        Self {
            item_repo,
            resolver,
        }
    }

    /// Lists a wishlist's items as the current viewer sees them.
    ///
    /// Non-owner viewers never see items marked private, whatever role
    /// or visibility let them reach the list.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
    ) -> AppResult<Vec<WishlistItem>> {
        let (wishlist, decision) = self.resolver.require_view(ctx, wishlist_id).await?;
        self.item_repo
            .list_for_wishlist(wishlist.id, decision.is_owner)
            .await
    }

    /// Adds an item to a wishlist. Requires edit access.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
        mut data: CreateItem,
    ) -> AppResult<WishlistItem> {
        let (wishlist, _) = self.resolver.require_edit(ctx, wishlist_id).await?;

        data.title = data.title.trim().to_string();
        if data.title.is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if let Some(amount) = data.price_amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(AppError::validation("Price must be a non-negative number"));
            }
        }
        data.price_currency = data
            .price_currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());

        let item = self.item_repo.create(wishlist.id, &data).await?;
        info!(
            account_id = ctx.account_id,
            wishlist_id,
            item_id = item.id,
            "Item created"
        );
        Ok(item)
    }

    /// Updates an item. Requires edit access on the owning list.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        item_id: i64,
        update: UpdateItem,
    ) -> AppResult<WishlistItem> {
        if update.is_empty() {
            return Err(AppError::validation("No changes supplied"));
        }

        let mut item = self
            .item_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;
        self.resolver.require_edit(ctx, item.wishlist_id).await?;

        if let Some(title) = update.title {
            let trimmed = title.trim().to_string();
            if trimmed.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
            item.title = trimmed;
        }
        if let Some(image_url) = update.image_url {
            item.image_url = image_url;
        }
        if let Some(link_url) = update.link_url {
            item.link_url = link_url;
        }
        if let Some(price_amount) = update.price_amount {
            if let Some(amount) = price_amount {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(AppError::validation("Price must be a non-negative number"));
                }
            }
            item.price_amount = price_amount;
        }
        if let Some(price_currency) = update.price_currency {
            item.price_currency = price_currency
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty());
        }
        if let Some(notes) = update.notes {
            item.notes = notes;
        }
        if let Some(priority) = update.priority {
            item.priority = priority;
        }
        if let Some(visibility) = update.visibility {
            item.visibility = visibility;
        }
        if let Some(is_gifted) = update.is_gifted {
            item.is_gifted = is_gifted;
        }

        self.item_repo.update(&item).await?;
        info!(
            account_id = ctx.account_id,
            item_id, "Item updated"
        );
        Ok(item)
    }

    /// Deletes an item. Requires edit access on the owning list.
    pub async fn delete(&self, ctx: &RequestContext, item_id: i64) -> AppResult<()> {
        let item = self
            .item_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;
        self.resolver.require_edit(ctx, item.wishlist_id).await?;

        self.item_repo.soft_delete(item.id).await?;
        info!(
            account_id = ctx.account_id,
            item_id, "Item deleted"
        );
        Ok(())
    }
}
