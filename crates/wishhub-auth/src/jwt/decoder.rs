//! Session token validation.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use wishhub_core::config::auth::AuthConfig;
use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;

use super::claims::Claims;

/// Validates session tokens and resolves the subject account.
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration (algorithm pinned to HS256).
    validation: Validation,
    /// Clock-skew leeway in seconds.
    leeway: i64,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        // Pinning the algorithm here rejects any token whose header
        // declares something other than HS256, including "none".
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.jwt_leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            leeway: config.jwt_leeway_seconds as i64,
        }
    }

    /// Decodes and validates a token string, returning its claims.
    ///
    /// Checks, in order: structural shape (three dot-separated segments),
    /// declared algorithm, signature (constant-time inside the library),
    /// `nbf`/`exp` within leeway, and that `iat` is not implausibly
    /// future-dated.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        AppError::unauthorized("Token is not yet valid")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                        AppError::unauthorized("Invalid token algorithm")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        let claims = token_data.claims;

        if claims.iat > Utc::now().timestamp() + self.leeway {
            return Err(AppError::unauthorized("Token issued in the future"));
        }

        Ok(claims)
    }

    /// Decodes a token and returns the authenticated account ID.
    pub fn decode_account_id(&self, token: &str) -> AppResult<i64> {
        self.decode(token)?.subject_account_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::TokenEncoder;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config() -> AuthConfig {
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

    fn raw_token(claims: &Claims, header: &Header) -> String {
        let key = EncodingKey::from_secret(config().jwt_secret.as_bytes());
        encode(header, claims, &key).unwrap()
    }

    #[test]
    fn issued_token_round_trips() {
        let cfg = config();
        let encoder = TokenEncoder::new(&cfg);
        let decoder = TokenDecoder::new(&cfg);

        let token = encoder.issue(42).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(decoder.decode_account_id(&token).unwrap(), 42);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "wishhub-api".to_string(),
            sub: "42".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            nbf: None,
        };
        let token = raw_token(&claims, &Header::default());
        let err = TokenDecoder::new(&config()).decode(&token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn altered_algorithm_is_rejected_even_with_valid_signature() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "wishhub-api".to_string(),
            sub: "42".to_string(),
            iat: now,
            exp: now + 3600,
            nbf: None,
        };
        // Correctly signed under HS384 with the same secret; the decoder
        // must still refuse it because the algorithm is pinned.
        let token = raw_token(&claims, &Header::new(Algorithm::HS384));
        assert!(TokenDecoder::new(&config()).decode(&token).is_err());
    }

    #[test]
    fn future_nbf_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "wishhub-api".to_string(),
            sub: "42".to_string(),
            iat: now,
            exp: now + 3600,
            nbf: Some(now + 600),
        };
        let token = raw_token(&claims, &Header::default());
        assert!(TokenDecoder::new(&config()).decode(&token).is_err());
    }

    #[test]
    fn future_iat_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "wishhub-api".to_string(),
            sub: "42".to_string(),
            iat: now + 600,
            exp: now + 3600,
            nbf: None,
        };
        let token = raw_token(&claims, &Header::default());
        let err = TokenDecoder::new(&config()).decode(&token).unwrap_err();
        assert_eq!(err.message, "Token issued in the future");
    }

    #[test]
    fn non_positive_subject_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "wishhub-api".to_string(),
            sub: "0".to_string(),
            iat: now,
            exp: now + 3600,
            nbf: None,
        };
        let token = raw_token(&claims, &Header::default());
        assert!(TokenDecoder::new(&config())
            .decode_account_id(&token)
            .is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        let decoder = TokenDecoder::new(&config());
        assert!(decoder.decode("not-a-token").is_err());
        assert!(decoder.decode("two.segments").is_err());
        assert!(decoder.decode("").is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let cfg = config();
        let token = TokenEncoder::new(&cfg).issue(42).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        // Flip a byte of the payload segment.
        let mut payload = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        assert!(TokenDecoder::new(&cfg).decode(&parts.join(".")).is_err());
    }
}
