//! Account entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Who may see an account's birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "birth_visibility", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BirthDateVisibility {
    /// Visible only to the account itself.
    Private,
    /// Visible to accepted friends.
    Friends,
    /// Hidden from display but still used for birthday reminders.
    HiddenButUsed,
}

impl BirthDateVisibility {
    /// Return the visibility as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Friends => "friends",
            Self::HiddenButUsed => "hidden_but_used",
        }
    }

    /// Normalize a caller-supplied value, falling back to `Friends`.
    pub fn normalize(s: &str) -> Self {
        match s.trim() {
            "private" => Self::Private,
            "hidden_but_used" => Self::HiddenButUsed,
            _ => Self::Friends,
        }
    }
}

impl std::fmt::Display for BirthDateVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a caller-supplied language code to one of the supported
/// languages, falling back to English.
pub fn normalize_language(lang: &str) -> &'static str {
    match lang.trim().to_lowercase().as_str() {
        "es" => "es",
        "fr" => "fr",
        "pt" => "pt",
        _ => "en",
    }
}

/// A registered account in the Wishhub system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: i64,
    /// Email address, unique among non-deleted accounts.
    pub email: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Profile photo URL (optional).
    pub photo_url: Option<String>,
    /// Birth date (optional).
    pub birth_date: Option<NaiveDate>,
    /// Who may see the birth date.
    pub birth_date_visibility: BirthDateVisibility,
    /// Preferred language code (es, en, fr, pt).
    pub preferred_language: String,
    /// Whether the email has been confirmed via OTP.
    pub validated: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A local credential row for an account.
///
/// The OTP challenge lives alongside the credential: at most one live
/// challenge per account, overwritten on reissue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    /// Unique credential identifier.
    pub id: i64,
    /// Owning account.
    pub account_id: i64,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Credential provider, currently always `"local"`.
    pub provider: String,
    /// Argon2 hash of the last issued one-time passcode.
    #[serde(skip_serializing)]
    pub otp_hash: Option<String>,
    /// When the last issued passcode expires.
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// When the credential was created.
    pub created_at: DateTime<Utc>,
    /// When the credential was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Birth date (optional).
    pub birth_date: Option<NaiveDate>,
    /// Birth date visibility.
    pub birth_date_visibility: BirthDateVisibility,
    /// Preferred language code.
    pub preferred_language: String,
}

/// Partial update to an account's own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New display name.
    pub display_name: Option<String>,
    /// New photo URL; `Some(None)` clears the field.
    pub photo_url: Option<Option<String>>,
    /// New birth date; `Some(None)` clears the field.
    pub birth_date: Option<Option<NaiveDate>>,
    /// New birth date visibility.
    pub birth_date_visibility: Option<BirthDateVisibility>,
    /// New preferred language.
    pub preferred_language: Option<String>,
}

impl UpdateProfile {
    /// Whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.photo_url.is_none()
            && self.birth_date.is_none()
            && self.birth_date_visibility.is_none()
            && self.preferred_language.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_normalization_falls_back_to_english() {
        assert_eq!(normalize_language("ES"), "es");
        assert_eq!(normalize_language(" fr "), "fr");
        assert_eq!(normalize_language("de"), "en");
        assert_eq!(normalize_language(""), "en");
    }

    #[test]
    fn birth_visibility_normalization_falls_back_to_friends() {
        assert_eq!(
            BirthDateVisibility::normalize("private"),
            BirthDateVisibility::Private
        );
        assert_eq!(
            BirthDateVisibility::normalize("hidden_but_used"),
            BirthDateVisibility::HiddenButUsed
        );
        assert_eq!(
            BirthDateVisibility::normalize("whatever"),
            BirthDateVisibility::Friends
        );
    }

    #[test]
    fn empty_profile_update_is_detected() {
        assert!(UpdateProfile::default().is_empty());
        let update = UpdateProfile {
            display_name: Some("Ana".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
