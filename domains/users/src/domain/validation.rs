//! Credential format checks run by the HTTP layer

use pickup_common::{Error, Result};
use validator::ValidateEmail;

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LEN: usize = 4;

/// Emails are compared and stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(Error::InvalidEmail(email.to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::WeakPassword(format!(
            "must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
