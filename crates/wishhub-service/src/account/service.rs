
//! Account registration, login, validation, and profile self-service.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use wishhub_auth::otp::OtpService;
use wishhub_auth::password::{PasswordHasher, PasswordValidator};
use wishhub_auth::jwt::TokenEncoder;
use wishhub_core::error::{AppError, ErrorKind};
use wishhub_core::result::AppResult;
use wishhub_database::repositories::{AccountRepository, CredentialRepository};
use wishhub_entity::account::{
    normalize_language, Account, BirthDateVisibility, CreateAccount, Credential, UpdateProfile,
};

use super::mailer::OtpMailer;
use crate::context::RequestContext;

/// Data for creating a new account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Plaintext password.
    pub password: String,
    /// Birth date, `YYYY-MM-DD` (optional).
    pub birth_date: Option<String>,
    /// Birth date visibility (optional, defaults to friends).
    pub birth_date_visibility: Option<String>,
    /// Preferred language code (optional, defaults to en).
    pub preferred_language: Option<String>,
}

/// A successful login: the account plus its session token.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResponse {
    /// The authenticated account.
    pub account: Account,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Data for updating the current account.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UpdateMeRequest {
    /// Profile field changes.
    pub profile: UpdateProfile,
    /// Current password, required when `new_password` is set.
    pub current_password: Option<String>,
    /// New password (optional).
    pub new_password: Option<String>,
}

/// The single error every failed verification attempt collapses to, so
/// the endpoint never reveals whether an email is registered.
fn invalid_code() -> AppError {
    AppError::unauthorized("Invalid or expired verification code")
}

/// Checks a submitted code against the credential's stored challenge.
///
/// A missing challenge and a wrong or expired code produce the same
/// error.
fn check_challenge(otp: &OtpService, credential: &Credential, code: &str) -> AppResult<()> {
    let (hash, expires_at) = match (&credential.otp_hash, credential.otp_expires_at) {
        (Some(hash), Some(expires_at)) => (hash.as_str(), expires_at),
        _ => return Err(invalid_code()),
    };
    if !otp.verify(code, hash, expires_at)? {
        return Err(invalid_code());
    }
    Ok(())
}

/// Parses a strict `YYYY-MM-DD` birth date: exactly ten characters with
/// a four-digit year, and a real calendar date.
fn parse_birth_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
    if !shaped {
        return Err(AppError::validation("Birth date must be YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Birth date must be YYYY-MM-DD"))
}

/// Handles account lifecycle and self-service operations.
pub struct AccountService {
    /// Shared connection pool for multi-repository transactions.
    pool: PgPool,
    /// Account repository.
    account_repo: Arc<AccountRepository>,
    /// Credential repository.
    credential_repo: Arc<CredentialRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy validator.
    validator: Arc<PasswordValidator>,
    /// One-time passcode service.
    otp: Arc<OtpService>,
    /// Session token encoder.
    encoder: Arc<TokenEncoder>,
    /// Verification code delivery port.
    mailer: Arc<dyn OtpMailer>,
}

impl AccountService {
    /// Creates a new account service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        account_repo: Arc<AccountRepository>,
        credential_repo: Arc<CredentialRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        otp: Arc<OtpService>,
        encoder: Arc<TokenEncoder>,
        mailer: Arc<dyn OtpMailer>,
    ) -> Self {
        Self {
            pool,
            account_repo,
            credential_repo,
            hasher,
            validator,
            otp,
            encoder,
            mailer,
        }
    }

    /// Registers a new account.
    ///
    /// Inserts the account, its local credential, and the first
    /// verification challenge in one transaction, then hands the code to
    /// the mailer. Delivery failure does not undo the registration.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<Account> {
        let email = req.email.trim().to_lowercase();
        if !email.contains('@') || !email.contains('.') {
            return Err(AppError::validation("Invalid email format"));
        }
        let display_name = req.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }
        self.validator.validate(&req.password)?;

        let birth_date = match req.birth_date.as_deref() {
            Some(raw) => Some(parse_birth_date(raw)?),
            None => None,
        };
        let birth_date_visibility = req
            .birth_date_visibility
            .as_deref()
            .map(BirthDateVisibility::normalize)
            .unwrap_or(BirthDateVisibility::Friends);
        let preferred_language =
            normalize_language(req.preferred_language.as_deref().unwrap_or("")).to_string();

        if self.account_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let code = self.otp.generate();
        let challenge = self.otp.build_challenge(&code)?;
        let otp_expires_at = Utc::now() + Duration::minutes(challenge.ttl_minutes);

        let create = CreateAccount {
            email,
            display_name,
            birth_date,
            birth_date_visibility,
            preferred_language,
        };

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to begin transaction",
                e,
            )
        })?;
        let account = self.account_repo.create(&mut *tx, &create).await?;
        self.credential_repo
            .create(
                &mut *tx,
                account.id,
                &password_hash,
                Some(&challenge.code_hash),
                Some(otp_expires_at),
            )
            .await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to commit registration",
                e,
            )
        })?;

        if let Err(e) = self
            .mailer
            .send_code(&account.email, &account.preferred_language, &code)
            .await
        {
            warn!(account_id = account.id, error = %e, "Verification code delivery failed");
        }

        info!(account_id = account.id, "Account registered");
        Ok(account)
    }

    /// Authenticates an account and issues a session token.
    ///
    /// An unknown email and a wrong password produce the same error so
    /// neither reveals whether the address is registered.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let account = self
            .account_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        let credential = self
            .credential_repo
            .find_local_by_account(account.id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !self.hasher.verify(password, &credential.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        if !account.validated {
            return Err(AppError::unauthorized("Account email is not verified"));
        }

        let token = self.encoder.issue(account.id)?;
        info!(account_id = account.id, "Account logged in");
        Ok(LoginResponse { account, token })
    }

    /// Confirms an account's email with a verification code.
    ///
    /// The challenge is cleared on success so a code can be used once.
    /// An unknown email fails exactly like a wrong code so the endpoint
    /// cannot be used to enumerate registered addresses.
    pub async fn validate_account(&self, email: &str, code: &str) -> AppResult<Account> {
        let account = self
            .account_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid_code)?;

        if account.validated {
            return Ok(account);
        }

        let credential = self
            .credential_repo
            .find_local_by_account(account.id)
            .await?
            .ok_or_else(invalid_code)?;

        check_challenge(&self.otp, &credential, code)?;

        self.account_repo.mark_validated(account.id).await?;
        self.credential_repo.clear_otp_challenge(account.id).await?;

        info!(account_id = account.id, "Account validated");
        self.account_repo
            .find_by_id(account.id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))
    }

    /// Issues a fresh verification challenge for an unvalidated account.
    ///
    /// An unknown email fails the same way a failed verification does.
    pub async fn resend_code(&self, email: &str) -> AppResult<()> {
        let account = self
            .account_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid_code)?;

        if account.validated {
            return Err(AppError::conflict("Account is already validated"));
        }

        let code = self.otp.generate();
        let challenge = self.otp.build_challenge(&code)?;
        let expires_at = Utc::now() + Duration::minutes(challenge.ttl_minutes);
        self.credential_repo
            .set_otp_challenge(account.id, &challenge.code_hash, expires_at)
            .await?;

        self.mailer
            .send_code(&account.email, &account.preferred_language, &code)
            .await?;

        info!(account_id = account.id, "Verification code reissued");
        Ok(())
    }

    /// Gets the current account's full profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<Account> {
        self.account_repo
            .find_by_id(ctx.account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))
    }

    /// Updates the current account's profile and, optionally, password,
    /// in one transaction.
    pub async fn update_me(&self, ctx: &RequestContext, req: UpdateMeRequest) -> AppResult<Account> {
        let mut account = self.me(ctx).await?;

        if req.profile.is_empty() && req.new_password.is_none() {
            return Err(AppError::validation("No changes supplied"));
        }

        if let Some(display_name) = &req.profile.display_name {
            let trimmed = display_name.trim();
            if trimmed.is_empty() {
                return Err(AppError::validation("Display name cannot be empty"));
            }
            account.display_name = trimmed.to_string();
        }
        if let Some(photo_url) = &req.profile.photo_url {
            account.photo_url = photo_url.clone();
        }
        if let Some(birth_date) = req.profile.birth_date {
            account.birth_date = birth_date;
        }
        if let Some(visibility) = req.profile.birth_date_visibility {
            account.birth_date_visibility = visibility;
        }
        if let Some(language) = &req.profile.preferred_language {
            account.preferred_language = normalize_language(language).to_string();
        }

        let new_password_hash = match &req.new_password {
            Some(new_password) => {
                let current = req
                    .current_password
                    .as_deref()
                    .ok_or_else(|| AppError::validation("Current password is required"))?;
                let credential = self
                    .credential_repo
                    .find_local_by_account(account.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Account not found"))?;
                if !self.hasher.verify(current, &credential.password_hash)? {
                    return Err(AppError::unauthorized("Current password is incorrect"));
                }
                self.validator.validate(new_password)?;
                Some(self.hasher.hash(new_password)?)
            }
            None => None,
        };

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to begin transaction",
                e,
            )
        })?;
        self.account_repo.update(&mut *tx, &account).await?;
        if let Some(hash) = new_password_hash {
            self.credential_repo
                .set_password(&mut *tx, account.id, &hash)
                .await?;
        }
        tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to commit profile update",
                e,
            )
        })?;

        info!(account_id = account.id, "Profile updated");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use wishhub_core::config::auth::AuthConfig;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "fixture-token-secret".to_string(),
            jwt_issuer: "wishhub-api".to_string(),
            jwt_ttl_hours: 24,
            jwt_leeway_seconds: 0,
            password_min_length: 8,
            otp_digits: 6,
            otp_ttl_minutes: 10,
        }
    }

    fn credential(otp_hash: Option<&str>, otp_expires_at: Option<DateTime<Utc>>) -> Credential {
        let now = Utc::now();
        Credential {
            id: 1,
            account_id: 7,
            password_hash: "unused".to_string(),
            provider: "local".to_string(),
            otp_hash: otp_hash.map(str::to_string),
            otp_expires_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn register_request_defaults_normalize() {
        let visibility = None::<String>
            .as_deref()
            .map(BirthDateVisibility::normalize)
            .unwrap_or(BirthDateVisibility::Friends);
        assert_eq!(visibility, BirthDateVisibility::Friends);
        assert_eq!(normalize_language("PT"), "pt");
    }

    #[test]
    fn birth_date_requires_a_four_digit_year() {
        assert!(parse_birth_date("1990-06-15").is_ok());
        assert!(parse_birth_date(" 1990-06-15 ").is_ok());
        assert!(parse_birth_date("19-01-01").is_err());
        assert!(parse_birth_date("1990-2-3").is_err());
        assert!(parse_birth_date("1990/06/15").is_err());
        assert!(parse_birth_date("1990-02-30").is_err());
    }

    #[test]
    fn failed_verification_reveals_nothing_about_the_cause() {
        let otp = OtpService::new(&auth_config());
        let baseline = invalid_code();

        // No challenge stored at all.
        let missing = check_challenge(&otp, &credential(None, None), "123456").unwrap_err();
        // Expired challenge; the stored hash is never even parsed.
        let expired = check_challenge(
            &otp,
            &credential(
                Some("not-a-real-hash"),
                Some(Utc::now() - Duration::minutes(1)),
            ),
            "123456",
        )
        .unwrap_err();

        for err in [missing, expired] {
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert_eq!(err.kind, baseline.kind);
            assert_eq!(err.message, baseline.message);
        }
    }
}
