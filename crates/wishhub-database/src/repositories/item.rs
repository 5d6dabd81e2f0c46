//! Wishlist item repository implementation.

use sqlx::{PgConnection, PgPool};

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::wishlist::{CreateItem, WishlistItem};

/// Repository for wishlist items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Create a new item repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a live item by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<WishlistItem>> {
        sqlx::query_as::<_, WishlistItem>(
            "SELECT * FROM wishlist_items WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    /// List a wishlist's live items.
    ///
    /// With `include_private` false, items marked private are filtered
    /// out; that is the view non-owners get.
    pub async fn list_for_wishlist(
        &self,
        wishlist_id: i64,
        include_private: bool,
    ) -> AppResult<Vec<WishlistItem>> {
        sqlx::query_as::<_, WishlistItem>(
            "SELECT * FROM wishlist_items \
             WHERE wishlist_id = $1 AND deleted_at IS NULL \
               AND ($2 OR visibility <> 'private') \
             ORDER BY created_at ASC",
        )
        .bind(wishlist_id)
        .bind(include_private)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list items", e))
    }

    /// Insert a new item.
    pub async fn create(&self, wishlist_id: i64, data: &CreateItem) -> AppResult<WishlistItem> {
        sqlx::query_as::<_, WishlistItem>(
            "INSERT INTO wishlist_items \
             (wishlist_id, title, image_url, link_url, price_amount, price_currency, \
              notes, priority, visibility, is_gifted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(wishlist_id)
        .bind(&data.title)
        .bind(&data.image_url)
        .bind(&data.link_url)
        .bind(data.price_amount)
        .bind(&data.price_currency)
        .bind(&data.notes)
        .bind(data.priority)
        .bind(data.visibility)
        .bind(data.is_gifted)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create item", e))
    }

    /// Persist an item's mutable fields.
    pub async fn update(&self, item: &WishlistItem) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE wishlist_items SET title = $1, image_url = $2, link_url = $3, \
             price_amount = $4, price_currency = $5, notes = $6, priority = $7, \
             visibility = $8, is_gifted = $9, updated_at = NOW() \
             WHERE id = $10 AND deleted_at IS NULL",
        )
        .bind(&item.title)
        .bind(&item.image_url)
        .bind(&item.link_url)
        .bind(item.price_amount)
        .bind(&item.price_currency)
        .bind(&item.notes)
        .bind(item.priority)
        .bind(item.visibility)
        .bind(item.is_gifted)
        .bind(item.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update item", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete an item.
    pub async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE wishlist_items SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete item", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete all live items of a wishlist inside a caller-owned
    /// transaction. Used when the wishlist itself is deleted.
    pub async fn soft_delete_for_wishlist(
        &self,
        conn: &mut PgConnection,
        wishlist_id: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE wishlist_items SET deleted_at = NOW(), updated_at = NOW() \
             WHERE wishlist_id = $1 AND deleted_at IS NULL",
        )
        .bind(wishlist_id)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete wishlist items", e)
        })?;
        Ok(result.rows_affected())
    }
}
