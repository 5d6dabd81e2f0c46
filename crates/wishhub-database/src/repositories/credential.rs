//! Credential repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::account::Credential;

/// Repository for password and one-time-code credentials.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the local-provider credential for an account.
    pub async fn find_local_by_account(&self, account_id: i64) -> AppResult<Option<Credential>> {
        sqlx::query_as::<_, Credential>(
            "SELECT * FROM credentials \
             WHERE account_id = $1 AND provider = 'local' AND deleted_at IS NULL",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find credential", e))
    }

    /// Insert a local credential inside a caller-owned transaction.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        account_id: i64,
        password_hash: &str,
        otp_hash: Option<&str>,
        otp_expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Credential> {
        sqlx::query_as::<_, Credential>(
            "INSERT INTO credentials \
             (account_id, password_hash, provider, otp_hash, otp_expires_at) \
             VALUES ($1, $2, 'local', $3, $4) RETURNING *",
        )
        .bind(account_id)
        .bind(password_hash)
        .bind(otp_hash)
        .bind(otp_expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create credential", e))
    }

    /// Replace the stored password hash inside a caller-owned transaction.
    pub async fn set_password(
        &self,
        conn: &mut PgConnection,
        account_id: i64,
        password_hash: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE credentials SET password_hash = $1, updated_at = NOW() \
             WHERE account_id = $2 AND provider = 'local' AND deleted_at IS NULL",
        )
        .bind(password_hash)
        .bind(account_id)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set password", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a fresh one-time-code challenge, replacing any previous one.
    pub async fn set_otp_challenge(
        &self,
        account_id: i64,
        otp_hash: &str,
        otp_expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE credentials SET otp_hash = $1, otp_expires_at = $2, updated_at = NOW() \
             WHERE account_id = $3 AND provider = 'local' AND deleted_at IS NULL",
        )
        .bind(otp_hash)
        .bind(otp_expires_at)
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store verification code", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the stored one-time-code challenge after successful use.
    pub async fn clear_otp_challenge(&self, account_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE credentials SET otp_hash = NULL, otp_expires_at = NULL, updated_at = NOW() \
             WHERE account_id = $1 AND provider = 'local' AND deleted_at IS NULL",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear verification code", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
