//! Wishlist repository implementation.

use sqlx::{PgConnection, PgPool};

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::wishlist::{CreateWishlist, SharedWishlist, Wishlist};

/// Upper bound on discovery listing results.
const DISCOVER_LIMIT: i64 = 200;

/// Repository for wishlist CRUD and listing queries.
#[derive(Debug, Clone)]
pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    /// Create a new wishlist repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a live wishlist by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Wishlist>> {
        sqlx::query_as::<_, Wishlist>(
            "SELECT * FROM wishlists WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find wishlist", e))
    }

    /// Insert a new wishlist.
    pub async fn create(&self, owner_id: i64, data: &CreateWishlist) -> AppResult<Wishlist> {
        sqlx::query_as::<_, Wishlist>(
            "INSERT INTO wishlists (owner_id, title, description, visibility) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(owner_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.visibility)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create wishlist", e))
    }

    /// Persist a wishlist's mutable fields.
    pub async fn update(&self, wishlist: &Wishlist) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE wishlists SET title = $1, description = $2, visibility = $3, \
             updated_at = NOW() WHERE id = $4 AND deleted_at IS NULL",
        )
        .bind(&wishlist.title)
        .bind(&wishlist.description)
        .bind(wishlist.visibility)
        .bind(wishlist.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update wishlist", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a wishlist inside a caller-owned transaction.
    ///
    /// Items, grants, and share links are cascaded by the caller within
    /// the same transaction.
    pub async fn soft_delete(&self, conn: &mut PgConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE wishlists SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete wishlist", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// List an account's own live wishlists, newest first.
    pub async fn list_owned_by(&self, owner_id: i64) -> AppResult<Vec<Wishlist>> {
        sqlx::query_as::<_, Wishlist>(
            "SELECT * FROM wishlists WHERE owner_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list wishlists", e))
    }

    /// List wishlists shared with an account via a live grant.
    pub async fn list_shared_with(&self, account_id: i64) -> AppResult<Vec<SharedWishlist>> {
        sqlx::query_as::<_, SharedWishlist>(
            "SELECT w.id, w.owner_id, a.display_name AS owner_display_name, w.title, \
                    w.description, w.visibility, g.role, w.created_at \
             FROM wishlists w \
             JOIN permission_grants g ON g.wishlist_id = w.id \
             JOIN accounts a ON a.id = w.owner_id \
             WHERE g.account_id = $1 AND g.deleted_at IS NULL \
               AND w.deleted_at IS NULL AND a.deleted_at IS NULL \
             ORDER BY w.created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list shared wishlists", e)
        })
    }

    /// List other accounts' wishlists visible to the viewer by visibility
    /// alone: public lists plus friends-visible lists of accepted friends,
    /// excluding lists the viewer already has a grant on.
    pub async fn list_visible_to(&self, viewer_id: i64) -> AppResult<Vec<Wishlist>> {
        sqlx::query_as::<_, Wishlist>(
            "SELECT w.* FROM wishlists w \
             WHERE w.deleted_at IS NULL AND w.owner_id <> $1 \
               AND (w.visibility = 'public' \
                    OR (w.visibility = 'friends' AND EXISTS ( \
                        SELECT 1 FROM friend_edges f \
                        WHERE LEAST(f.requester_id, f.addressee_id) = LEAST(w.owner_id, $1) \
                          AND GREATEST(f.requester_id, f.addressee_id) = GREATEST(w.owner_id, $1) \
                          AND f.status = 'accepted' AND f.deleted_at IS NULL))) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM permission_grants g \
                   WHERE g.wishlist_id = w.id AND g.account_id = $1 \
                     AND g.deleted_at IS NULL) \
             ORDER BY w.created_at DESC LIMIT $2",
        )
        .bind(viewer_id)
        .bind(DISCOVER_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list visible wishlists", e)
        })
    }
}
