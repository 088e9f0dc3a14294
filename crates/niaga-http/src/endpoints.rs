//! Consumed endpoint paths and request/response types.

use serde::{Deserialize, Serialize};

use niaga_core::Identity;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// GET: fresh anti-forgery token.
pub const CSRF_TOKEN: &str = "/auth/csrf-token";

/// POST: credential exchange.
pub const LOGIN: &str = "/auth/login";

/// POST: server-side session invalidation.
pub const LOGOUT: &str = "/auth/logout";

/// POST: password change over the authenticated pipeline.
pub const PASSWORD_CHANGE: &str = "/auth/password/change";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from the anti-forgery token endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_credential: String,
    pub identity: Identity,
}

/// Request body for a password change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
    pub new_password_confirm: &'a str,
}

/// Error body shape returned by the API.
///
/// `detail` covers framework-style single-message bodies.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
