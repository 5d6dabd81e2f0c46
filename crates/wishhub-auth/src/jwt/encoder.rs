//! Session token creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use wishhub_core::config::auth::AuthConfig;
use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;

use super::claims::Claims;

/// Creates signed session tokens (HS256, fixed algorithm).
#[derive(Clone)]
pub struct TokenEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer claim value.
    issuer: String,
    /// Token TTL in hours.
    ttl_hours: i64,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder")
            .field("issuer", &self.issuer)
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl TokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            ttl_hours: config.jwt_ttl_hours as i64,
        }
    }

    /// Issues a new session token for the given account.
    pub fn issue(&self, account_id: i64) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: None,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
    }
}
