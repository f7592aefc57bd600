//! Password policy enforcement for new passwords.

use rolegate_core::config::AuthConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;

/// Characters that count as "special".
const SPECIAL: &str = "!@#$%^&*()_,.?\":{}|<>";

/// Checks new passwords against the configured length bounds and
/// character classes.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Returns the first violation found.
    pub fn validate(&self, password: &str) -> AppResult<()> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be between {} and {} characters long",
                self.min_length, self.max_length
            )));
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| SPECIAL.contains(c)) {
            return Err(AppError::validation(format!(
                "Password must contain at least one of {SPECIAL}"
            )));
        }

        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 16,
        }
    }
}
