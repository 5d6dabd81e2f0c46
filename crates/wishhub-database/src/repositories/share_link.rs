//! Share link repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::permission::GrantRole;
use wishhub_entity::share::ShareLink;

/// Repository for anonymous share links.
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new share link with a pre-generated token.
    pub async fn create(
        &self,
        wishlist_id: i64,
        token: &str,
        role: GrantRole,
        expires_at: Option<DateTime<Utc>>,
        created_by: i64,
    ) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (wishlist_id, token, role, expires_at, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(wishlist_id)
        .bind(token)
        .bind(role)
        .bind(expires_at)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share link", e))
    }

    /// Look up a link by token.
    ///
    /// Only soft-deleted rows are filtered here; revocation and expiry
    /// are evaluated by the caller against a single clock reading.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE token = $1 AND deleted_at IS NULL",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share link", e))
    }

    /// List a wishlist's non-deleted links, newest first.
    pub async fn list_for_wishlist(&self, wishlist_id: i64) -> AppResult<Vec<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE wishlist_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC",
        )
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list share links", e))
    }

    /// Revoke a link. Idempotent: an already revoked link keeps its
    /// original revocation time.
    pub async fn revoke(&self, id: i64, wishlist_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE share_links SET revoked_at = COALESCE(revoked_at, NOW()), \
             updated_at = NOW() \
             WHERE id = $1 AND wishlist_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(wishlist_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke share link", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete all links of a wishlist inside a caller-owned
    /// transaction. Used when the wishlist itself is deleted.
    pub async fn soft_delete_for_wishlist(
        &self,
        conn: &mut PgConnection,
        wishlist_id: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE share_links SET deleted_at = NOW(), updated_at = NOW() \
             WHERE wishlist_id = $1 AND deleted_at IS NULL",
        )
        .bind(wishlist_id)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete wishlist share links", e)
        })?;
        Ok(result.rows_affected())
    }
}
