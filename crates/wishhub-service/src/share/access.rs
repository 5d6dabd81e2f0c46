//! Anonymous share link resolution.

use std::sync::Arc;

use chrono::Utc;

use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;
use wishhub_database::repositories::{ItemRepository, ShareLinkRepository, WishlistRepository};
use wishhub_entity::permission::GrantRole;
use wishhub_entity::share::ShareLink;
use wishhub_entity::wishlist::{Wishlist, WishlistItem};

/// The wishlist a valid link resolves to, with the link itself.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LinkResolution {
    /// The exposed wishlist.
    pub wishlist: Wishlist,
    /// The role the link confers; always `reader`.
    pub role: GrantRole,
    /// The link record.
    pub link: ShareLink,
}

/// Resolves share tokens for unauthenticated viewers.
pub struct ShareAccessService {
    /// Share link repository.
    link_repo: Arc<ShareLinkRepository>,
    /// Wishlist repository.
    wishlist_repo: Arc<WishlistRepository>,
    /// Item repository.
    item_repo: Arc<ItemRepository>,
}

impl ShareAccessService {
    /// Creates a new share access service.
    pub fn new(
        link_repo: Arc<ShareLinkRepository>,
        wishlist_repo: Arc<WishlistRepository>,
        item_repo: Arc<ItemRepository>,
    ) -> Self {
        Self {
            link_repo,
            wishlist_repo,
            item_repo,
        }
    }

    /// Resolves a token to its wishlist.
    ///
    /// Unknown, revoked, expired, and deleted tokens all produce the
    /// same NotFound outcome so a caller learns nothing about which
    /// gate failed. The role is pinned to reader regardless of what the
    /// link stores.
    pub async fn resolve(&self, token: &str) -> AppResult<LinkResolution> {
        let link = self
            .link_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid share link"))?;

        if !link.is_valid_at(Utc::now()) {
            return Err(AppError::not_found("Invalid share link"));
        }

        let wishlist = self
            .wishlist_repo
            .find_by_id(link.wishlist_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid share link"))?;

        Ok(LinkResolution {
            wishlist,
            role: GrantRole::Reader,
            link,
        })
    }

    /// Lists the items a link holder may see: never the private ones.
    pub async fn list_items(&self, token: &str) -> AppResult<Vec<WishlistItem>> {
        let resolution = self.resolve(token).await?;
        self.item_repo
            .list_for_wishlist(resolution.wishlist.id, false)
            .await
    }
}
