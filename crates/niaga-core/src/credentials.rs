//! Login and password-change form types.

use std::fmt;

/// Login credentials.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental
/// logging.
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests. Never log
    /// or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide the password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// Clone is intentionally implemented to allow credentials to be reused,
// but the type is not Copy to make credential passing explicit.
impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// A password change submission: old password plus the new one, entered
/// twice. Confirmation agreement is enforced by the backend.
pub struct PasswordChange {
    old_password: String,
    new_password: String,
    new_password_confirm: String,
}

impl PasswordChange {
    /// Create a new password change submission.
    pub fn new(
        old_password: impl Into<String>,
        new_password: impl Into<String>,
        new_password_confirm: impl Into<String>,
    ) -> Self {
        Self {
            old_password: old_password.into(),
            new_password: new_password.into(),
            new_password_confirm: new_password_confirm.into(),
        }
    }

    /// Returns the current password.
    pub fn old_password(&self) -> &str {
        &self.old_password
    }

    /// Returns the requested password.
    pub fn new_password(&self) -> &str {
        &self.new_password
    }

    /// Returns the confirmation entry.
    pub fn new_password_confirm(&self) -> &str {
        &self.new_password_confirm
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange")
            .field("old_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("new_password_confirm", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("budi", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("budi"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn password_change_hides_all_fields_in_debug() {
        let change = PasswordChange::new("old-pass", "new-pass", "new-pass");
        let debug = format!("{:?}", change);
        assert!(!debug.contains("old-pass"));
        assert!(!debug.contains("new-pass"));
    }
}
