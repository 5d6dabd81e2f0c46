//! Client-application signature configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying that a request originates from the authorized
/// client application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Identifier the client application sends in its signature header.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Shared secret the client uses to sign requests.
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Tolerated clock difference between client timestamp and server time.
    #[serde(default = "default_max_skew")]
    pub max_skew_seconds: i64,
}

fn default_client_id() -> String {
    "wishhub.mobile".to_string()
}

fn default_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_max_skew() -> i64 {
    300
}
