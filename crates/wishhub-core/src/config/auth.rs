//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session token, password, and OTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issuer claim embedded in every session token.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Session token TTL in hours.
    #[serde(default = "default_jwt_ttl")]
    pub jwt_ttl_hours: u64,
    /// Clock-skew leeway for token claim validation, in seconds.
    #[serde(default = "default_jwt_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Number of digits in a one-time passcode.
    #[serde(default = "default_otp_digits")]
    pub otp_digits: usize,
    /// One-time passcode validity window in minutes.
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: i64,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_issuer() -> String {
    "wishhub-api".to_string()
}

fn default_jwt_ttl() -> u64 {
    24
}

fn default_jwt_leeway() -> u64 {
    30
}

fn default_password_min() -> usize {
    8
}

fn default_otp_digits() -> usize {
    6
}

fn default_otp_ttl() -> i64 {
    10
}
