//! HMAC-SHA256 request signature verification.
//!
//! Authenticates the *client application*, not the user: every protected
//! request must carry a client id, a millisecond timestamp, and an HMAC
//! signature over `"{client_id}.{timestamp}.{METHOD}.{path}"` computed
//! with the shared application secret. This check precedes account
//! identity resolution and has no side effects.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use wishhub_core::config::signature::SignatureConfig;
use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Verifies that a request carries a valid client-origin signature and an
/// acceptable timestamp skew.
#[derive(Clone)]
pub struct SignatureVerifier {
    /// Expected client application identifier.
    client_id: String,
    /// Shared signing secret.
    secret: String,
    /// Tolerated clock skew in seconds.
    max_skew_seconds: i64,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("client_id", &self.client_id)
            .field("max_skew_seconds", &self.max_skew_seconds)
            .finish()
    }
}

impl SignatureVerifier {
    /// Creates a new verifier from signature configuration.
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            secret: config.secret.clone(),
            max_skew_seconds: config.max_skew_seconds,
        }
    }

    /// Computes the hex signature the client is expected to send.
    ///
    /// `path` is the request path with the query string stripped and any
    /// prefix before the entry point removed.
    pub fn sign(&self, timestamp_millis: i64, method: &str, path: &str) -> String {
        let payload = format!(
            "{}.{}.{}.{}",
            self.client_id,
            timestamp_millis,
            method.to_uppercase(),
            path
        );
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verifies the three signature headers against the current clock.
    pub fn verify(
        &self,
        client_id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
        method: &str,
        path: &str,
    ) -> AppResult<()> {
        self.verify_at(
            client_id,
            timestamp,
            signature,
            method,
            path,
            Utc::now().timestamp(),
        )
    }

    /// Verifies against an explicit server time (seconds since epoch).
    pub fn verify_at(
        &self,
        client_id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
        method: &str,
        path: &str,
        now_secs: i64,
    ) -> AppResult<()> {
        let (client_id, timestamp, signature) = match (client_id, timestamp, signature) {
            (Some(c), Some(t), Some(s)) => (c, t, s),
            _ => return Err(AppError::unauthorized("missing_app_headers")),
        };

        if client_id != self.client_id {
            return Err(AppError::unauthorized("invalid_client_id"));
        }

        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::unauthorized("invalid_timestamp"));
        }
        let ts_millis: i64 = timestamp
            .parse()
            .map_err(|_| AppError::unauthorized("invalid_timestamp"))?;

        // The client sends milliseconds; skew is checked in seconds.
        if (now_secs - ts_millis / 1000).abs() > self.max_skew_seconds {
            return Err(AppError::unauthorized("timestamp_out_of_range"));
        }

        let payload = format!(
            "{}.{}.{}.{}",
            self.client_id,
            timestamp,
            method.to_uppercase(),
            path
        );
        let supplied =
            hex::decode(signature).map_err(|_| AppError::unauthorized("invalid_signature"))?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&supplied)
            .map_err(|_| AppError::unauthorized("invalid_signature"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishhub_core::error::ErrorKind;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(&SignatureConfig {
            client_id: "wishhub.mobile".to_string(),
            secret: "fixture-signing-secret".to_string(),
            max_skew_seconds: 300,
        })
    }

    #[test]
    fn valid_signature_within_skew_is_accepted() {
        let v = verifier();
        let now = 1_700_000_000i64;
        let ts = now * 1000;
        let sig = v.sign(ts, "GET", "/wishlists/42");

        let result = v.verify_at(
            Some("wishhub.mobile"),
            Some(&ts.to_string()),
            Some(&sig),
            "GET",
            "/wishlists/42",
            now,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn missing_header_is_rejected() {
        let v = verifier();
        let err = v
            .verify_at(Some("wishhub.mobile"), None, Some("ab"), "GET", "/x", 0)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "missing_app_headers");
    }

    #[test]
    fn wrong_client_id_is_rejected() {
        let v = verifier();
        let err = v
            .verify_at(
                Some("other.app"),
                Some("1000"),
                Some("ab"),
                "GET",
                "/x",
                1,
            )
            .unwrap_err();
        assert_eq!(err.message, "invalid_client_id");
    }

    #[test]
    fn non_numeric_timestamp_is_rejected() {
        let v = verifier();
        let err = v
            .verify_at(
                Some("wishhub.mobile"),
                Some("17e9"),
                Some("ab"),
                "GET",
                "/x",
                1,
            )
            .unwrap_err();
        assert_eq!(err.message, "invalid_timestamp");
    }

    #[test]
    fn timestamp_beyond_skew_is_rejected() {
        let v = verifier();
        let now = 1_700_000_000i64;
        let ts = (now - 301) * 1000;
        let sig = v.sign(ts, "GET", "/x");
        let err = v
            .verify_at(
                Some("wishhub.mobile"),
                Some(&ts.to_string()),
                Some(&sig),
                "GET",
                "/x",
                now,
            )
            .unwrap_err();
        assert_eq!(err.message, "timestamp_out_of_range");
    }

    #[test]
    fn tampering_any_input_breaks_the_signature() {
        let v = verifier();
        let now = 1_700_000_000i64;
        let ts = now * 1000;
        let sig = v.sign(ts, "GET", "/wishlists/42");

        // Altered path.
        assert!(v
            .verify_at(
                Some("wishhub.mobile"),
                Some(&ts.to_string()),
                Some(&sig),
                "GET",
                "/wishlists/43",
                now,
            )
            .is_err());

        // Altered method.
        assert!(v
            .verify_at(
                Some("wishhub.mobile"),
                Some(&ts.to_string()),
                Some(&sig),
                "POST",
                "/wishlists/42",
                now,
            )
            .is_err());

        // Altered signature byte.
        let mut bad = sig.clone().into_bytes();
        bad[0] = if bad[0] == b'a' { b'b' } else { b'a' };
        let bad = String::from_utf8(bad).unwrap();
        assert!(v
            .verify_at(
                Some("wishhub.mobile"),
                Some(&ts.to_string()),
                Some(&bad),
                "GET",
                "/wishlists/42",
                now,
            )
            .is_err());

        // Altered timestamp (within skew, but not the signed one).
        let other_ts = (ts + 1000).to_string();
        assert!(v
            .verify_at(
                Some("wishhub.mobile"),
                Some(&other_ts),
                Some(&sig),
                "GET",
                "/wishlists/42",
                now,
            )
            .is_err());
    }

    #[test]
    fn method_casing_is_normalized() {
        let v = verifier();
        let now = 1_700_000_000i64;
        let ts = now * 1000;
        let sig = v.sign(ts, "get", "/x");
        assert!(v
            .verify_at(
                Some("wishhub.mobile"),
                Some(&ts.to_string()),
                Some(&sig),
                "GET",
                "/x",
                now,
            )
            .is_ok());
    }
}
