//! Error types for the niaga client libraries.
//!
//! A unified error type with explicit variants for transport,
//! authentication, protocol, input validation and storage failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for niaga operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, missing session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Protocol errors (unexpected API responses).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (invalid URL, role, form contents).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Durable storage errors (identity cache, local user store).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted credentials were rejected.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An operation that requires an authenticated session was attempted
    /// without one.
    #[error("not authenticated")]
    NotAuthenticated,

    /// A login attempt was rejected because another one is in flight.
    #[error("a login attempt is already in progress")]
    LoginInProgress,
}

/// Protocol-level errors from API responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// API error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is a credential rejection.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.error.as_deref() == Some("InvalidCredentials")
    }

    /// Check if this is an anti-forgery rejection. A request carrying a
    /// stale anti-forgery token is recoverable: the user retries after the
    /// token has been re-fetched.
    pub fn is_csrf_rejection(&self) -> bool {
        self.error.as_deref() == Some("CsrfRejected")
            || (self.status == 403
                && self
                    .message
                    .as_deref()
                    .is_some_and(|m| m.contains("CSRF")))
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Unknown role name.
    #[error("unknown role '{value}'")]
    Role { value: String },

    /// Invalid username.
    #[error("invalid username '{value}': {reason}")]
    Username { value: String, reason: String },

    /// Password change form contents were rejected before submission.
    #[error("invalid password change: {message}")]
    PasswordChange { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A stored record could not be decoded.
    #[error("corrupt record: {message}")]
    Corrupt { message: String },
}
