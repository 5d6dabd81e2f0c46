//! Permission grant repository implementation.

use sqlx::{PgConnection, PgPool};

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::permission::{GrantRole, GrantSummary, PermissionGrant};

/// Repository for explicit per-wishlist role grants.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the live grant one account holds on one wishlist.
    pub async fn find_for(
        &self,
        wishlist_id: i64,
        account_id: i64,
    ) -> AppResult<Option<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE wishlist_id = $1 AND account_id = $2 AND deleted_at IS NULL",
        )
        .bind(wishlist_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grant", e))
    }

    /// Create or refresh a grant.
    ///
    /// The `(wishlist_id, account_id)` pair is unique including revoked
    /// rows, so re-sharing revives the old row with the new role.
    pub async fn upsert(
        &self,
        wishlist_id: i64,
        account_id: i64,
        role: GrantRole,
    ) -> AppResult<PermissionGrant> {
        sqlx::query_as::<_, PermissionGrant>(
            "INSERT INTO permission_grants (wishlist_id, account_id, role) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (wishlist_id, account_id) DO UPDATE \
             SET role = EXCLUDED.role, deleted_at = NULL, updated_at = NOW() \
             RETURNING *",
        )
        .bind(wishlist_id)
        .bind(account_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert grant", e))
    }

    /// Revoke a live grant.
    pub async fn revoke(&self, wishlist_id: i64, account_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE permission_grants SET deleted_at = NOW(), updated_at = NOW() \
             WHERE wishlist_id = $1 AND account_id = $2 AND deleted_at IS NULL",
        )
        .bind(wishlist_id)
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke grant", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// List a wishlist's live grants joined with grantee accounts.
    pub async fn list_for_wishlist(&self, wishlist_id: i64) -> AppResult<Vec<GrantSummary>> {
        sqlx::query_as::<_, GrantSummary>(
            "SELECT g.id AS grant_id, g.role, a.id AS account_id, \
                    a.display_name AS account_display_name, a.email AS account_email, \
                    g.created_at \
             FROM permission_grants g \
             JOIN accounts a ON a.id = g.account_id \
             WHERE g.wishlist_id = $1 AND g.deleted_at IS NULL AND a.deleted_at IS NULL \
             ORDER BY g.created_at ASC",
        )
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    /// Soft-delete all live grants of a wishlist inside a caller-owned
    /// transaction. Used when the wishlist itself is deleted.
    pub async fn soft_delete_for_wishlist(
        &self,
        conn: &mut PgConnection,
        wishlist_id: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE permission_grants SET deleted_at = NOW(), updated_at = NOW() \
             WHERE wishlist_id = $1 AND deleted_at IS NULL",
        )
        .bind(wishlist_id)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete wishlist grants", e)
        })?;
        Ok(result.rows_affected())
    }
}
