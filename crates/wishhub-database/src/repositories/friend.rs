//! Friend edge repository implementation.

use sqlx::PgPool;

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::friend::{FriendEdge, FriendStatus, FriendSummary};

/// Repository for the friendship graph.
///
/// The unordered-pair uniqueness constraint lives in the database (a
/// partial unique index over `LEAST`/`GREATEST` of the pair on live
/// rows), so concurrent duplicate requests surface here as conflicts.
#[derive(Debug, Clone)]
pub struct FriendRepository {
    pool: PgPool,
}

impl FriendRepository {
    /// Create a new friend repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a live edge by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<FriendEdge>> {
        sqlx::query_as::<_, FriendEdge>(
            "SELECT * FROM friend_edges WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find friend edge", e))
    }

    /// Find the live edge between two accounts in either direction,
    /// regardless of status.
    pub async fn find_pair(&self, a: i64, b: i64) -> AppResult<Option<FriendEdge>> {
        sqlx::query_as::<_, FriendEdge>(
            "SELECT * FROM friend_edges \
             WHERE LEAST(requester_id, addressee_id) = LEAST($1, $2) \
               AND GREATEST(requester_id, addressee_id) = GREATEST($1, $2) \
               AND deleted_at IS NULL",
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find friend pair", e))
    }

    /// Whether an accepted live edge exists between the two accounts.
    pub async fn are_friends(&self, a: i64, b: i64) -> AppResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
               SELECT 1 FROM friend_edges \
               WHERE LEAST(requester_id, addressee_id) = LEAST($1, $2) \
                 AND GREATEST(requester_id, addressee_id) = GREATEST($1, $2) \
                 AND status = 'accepted' AND deleted_at IS NULL)",
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check friendship", e))?;
        Ok(exists.0)
    }

    /// Insert a pending edge from requester to addressee.
    ///
    /// A unique violation means another live edge for the pair won the
    /// race and is reported as a conflict.
    pub async fn insert_pending(&self, requester_id: i64, addressee_id: i64) -> AppResult<FriendEdge> {
        sqlx::query_as::<_, FriendEdge>(
            "INSERT INTO friend_edges (requester_id, addressee_id, status) \
             VALUES ($1, $2, 'pending') RETURNING *",
        )
        .bind(requester_id)
        .bind(addressee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                AppError::conflict("friend_request_already_exists")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create friend request", e)
            }
        })
    }

    /// Transition an edge to a new status.
    ///
    /// Guarded on the current status so a decision on an already
    /// decided edge affects no rows.
    pub async fn update_status(
        &self,
        id: i64,
        from: FriendStatus,
        to: FriendStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE friend_edges SET status = $1, updated_at = NOW() \
             WHERE id = $2 AND status = $3 AND deleted_at IS NULL",
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update friend status", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete an edge (unfriend or withdraw a request).
    pub async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE friend_edges SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete friend edge", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// List accepted friends of an account, joined with the counterpart
    /// account's public profile fields.
    pub async fn list_accepted_for(&self, account_id: i64) -> AppResult<Vec<FriendSummary>> {
        sqlx::query_as::<_, FriendSummary>(
            "SELECT f.id AS edge_id, f.status, a.id AS friend_id, \
                    a.display_name AS friend_display_name, a.photo_url AS friend_photo_url, \
                    f.created_at \
             FROM friend_edges f \
             JOIN accounts a ON a.id = CASE \
                 WHEN f.requester_id = $1 THEN f.addressee_id ELSE f.requester_id END \
             WHERE (f.requester_id = $1 OR f.addressee_id = $1) \
               AND f.status = 'accepted' AND f.deleted_at IS NULL \
               AND a.deleted_at IS NULL \
             ORDER BY a.display_name ASC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list friends", e))
    }

    /// List pending requests addressed to an account.
    pub async fn list_pending_incoming(&self, account_id: i64) -> AppResult<Vec<FriendSummary>> {
        sqlx::query_as::<_, FriendSummary>(
            "SELECT f.id AS edge_id, f.status, a.id AS friend_id, \
                    a.display_name AS friend_display_name, a.photo_url AS friend_photo_url, \
                    f.created_at \
             FROM friend_edges f \
             JOIN accounts a ON a.id = f.requester_id \
             WHERE f.addressee_id = $1 AND f.status = 'pending' AND f.deleted_at IS NULL \
               AND a.deleted_at IS NULL \
             ORDER BY f.created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list incoming requests", e)
        })
    }

    /// List pending requests initiated by an account.
    pub async fn list_pending_outgoing(&self, account_id: i64) -> AppResult<Vec<FriendSummary>> {
        sqlx::query_as::<_, FriendSummary>(
            "SELECT f.id AS edge_id, f.status, a.id AS friend_id, \
                    a.display_name AS friend_display_name, a.photo_url AS friend_photo_url, \
                    f.created_at \
             FROM friend_edges f \
             JOIN accounts a ON a.id = f.addressee_id \
             WHERE f.requester_id = $1 AND f.status = 'pending' AND f.deleted_at IS NULL \
               AND a.deleted_at IS NULL \
             ORDER BY f.created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list outgoing requests", e)
        })
    }
}
