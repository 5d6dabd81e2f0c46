//! Session token claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;

/// Claims payload embedded in every session token.
///
/// A session token is not persisted anywhere: it exists only for its
/// validity window and cannot be revoked short of rotating the secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer.
    pub iss: String,
    /// Subject — the account ID, serialized as a string.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Not-before timestamp (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl Claims {
    /// Returns the account ID from the subject claim.
    ///
    /// Rejects an absent, non-numeric, or non-positive subject.
    pub fn subject_account_id(&self) -> AppResult<i64> {
        let id: i64 = self
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))?;
        if id <= 0 {
            return Err(AppError::unauthorized("Invalid token subject"));
        }
        Ok(id)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            iss: "wishhub-api".to_string(),
            sub: sub.to_string(),
            iat: 0,
            exp: i64::MAX,
            nbf: None,
        }
    }

    #[test]
    fn subject_must_be_a_positive_integer() {
        assert_eq!(claims("42").subject_account_id().unwrap(), 42);
        assert!(claims("0").subject_account_id().is_err());
        assert!(claims("-7").subject_account_id().is_err());
        assert!(claims("abc").subject_account_id().is_err());
        assert!(claims("").subject_account_id().is_err());
    }
}
