//! Password policy enforcement.

use wishhub_core::config::auth::AuthConfig;
use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;

/// Enforces the password policy on registration and password change.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum accepted length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a candidate password against the policy.
    pub fn validate(&self, password: &str) -> AppResult<()> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator { min_length: 8 }
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validator().validate("seven77").is_err());
        assert!(validator().validate("eight888").is_ok());
    }

    #[test]
    fn length_is_counted_in_characters_not_bytes() {
        // Eight multibyte characters.
        assert!(validator().validate("ññññññññ").is_ok());
    }
}
