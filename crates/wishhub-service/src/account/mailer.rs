//! Outbound email port for verification codes.

use async_trait::async_trait;

use wishhub_core::result::AppResult;

/// Delivers one-time verification codes to account email addresses.
///
/// The host process supplies the concrete transport; services only see
/// this trait.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Sends a verification code to the given address, localized to the
    /// account's preferred language.
    async fn send_code(&self, email: &str, language: &str, code: &str) -> AppResult<()>;
}
