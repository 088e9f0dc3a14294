//! Token types attached to the outgoing request pipeline.

use std::fmt;

/// The anti-forgery token bound to the current browser session.
///
/// Required on every state-mutating request. Fetched at process start and
/// again immediately before a login attempt, since the server may rotate
/// it. Held only in volatile memory; never persisted to durable storage.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Create a new anti-forgery token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in request headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"[REDACTED]").finish()
    }
}

/// The access credential proving an authenticated identity.
///
/// Attached as a bearer header to requests issued after login and removed
/// on logout. Like the anti-forgery token it lives only in memory.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct AccessCredential(String);

impl AccessCredential {
    /// Create a new access credential.
    pub fn new(credential: impl Into<String>) -> Self {
        Self(credential.into())
    }

    /// Returns the credential value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide credential value in Debug output
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessCredential")
            .field(&"[REDACTED]")
            .finish()
    }
}
