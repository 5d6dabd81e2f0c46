//! Account repository implementation.

use sqlx::{PgConnection, PgPool};

use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_entity::account::{Account, CreateAccount};

/// Repository for account CRUD and query operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a live account by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    /// Find a live account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
        })
    }

    /// Insert a new account inside a caller-owned transaction.
    ///
    /// The partial unique index on live emails turns a concurrent
    /// duplicate registration into a conflict.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        data: &CreateAccount,
    ) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts \
             (email, display_name, birth_date, birth_date_visibility, preferred_language) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.display_name)
        .bind(data.birth_date)
        .bind(data.birth_date_visibility)
        .bind(&data.preferred_language)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                AppError::conflict("email_already_registered")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create account", e)
            }
        })
    }

    /// Persist an account's mutable profile fields.
    pub async fn update(&self, conn: &mut PgConnection, account: &Account) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET display_name = $1, photo_url = $2, birth_date = $3, \
             birth_date_visibility = $4, preferred_language = $5, updated_at = NOW() \
             WHERE id = $6 AND deleted_at IS NULL",
        )
        .bind(&account.display_name)
        .bind(&account.photo_url)
        .bind(account.birth_date)
        .bind(account.birth_date_visibility)
        .bind(&account.preferred_language)
        .bind(account.id)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update account", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an account's email as confirmed.
    pub async fn mark_validated(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET validated = TRUE, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark account validated", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
