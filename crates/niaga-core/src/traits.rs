//! Trait seams between the session lifecycle and its collaborators.
//!
//! The authentication gateway and session store are written entirely
//! against these traits; the HTTP backend, the filesystem backend, the
//! durable cache and the presentation surfaces plug in at composition
//! time. No ambient globals.

use async_trait::async_trait;

use crate::credentials::{Credentials, PasswordChange};
use crate::tokens::{AccessCredential, CsrfToken};
use crate::types::Identity;
use crate::Result;

/// Output from a successful login.
#[derive(Debug)]
pub struct LoginOutput {
    /// The access credential to attach to subsequent requests.
    pub access_credential: AccessCredential,
    /// The authenticated identity.
    pub identity: Identity,
}

/// An authentication backend: the network-facing half of the handshake.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Request a fresh anti-forgery token.
    async fn fetch_csrf_token(&self) -> Result<CsrfToken>;

    /// Exchange credentials for an access credential and identity.
    async fn login(&self, credentials: Credentials) -> Result<LoginOutput>;

    /// Invalidate the session server-side. The response body is ignored
    /// either way.
    async fn logout(&self) -> Result<()>;

    /// Change the account password over the authenticated pipeline.
    async fn change_password(&self, change: &PasswordChange) -> Result<()>;
}

/// Durable client storage for the cached identity.
///
/// One record, JSON-encoded. Written on successful login, removed on
/// logout, read once at boot as a non-authoritative hint.
pub trait IdentityCache: Send + Sync {
    /// Read the cached identity, if any.
    fn load(&self) -> Result<Option<Identity>>;

    /// Persist the identity.
    fn store(&self, identity: &Identity) -> Result<()>;

    /// Remove the cached identity. Must succeed when nothing is cached.
    fn clear(&self) -> Result<()>;
}

/// Write access to the process-wide outgoing request defaults.
///
/// The anti-forgery token and access credential are shared mutable state
/// attached to the request pipeline; only the authentication gateway and
/// the session store (driven by the gateway) mutate them, always before
/// any dependent request is issued.
pub trait RequestDefaults: Send + Sync {
    /// Set or clear the anti-forgery token header.
    fn set_csrf_token(&self, token: Option<CsrfToken>);

    /// Set or clear the bearer access credential header.
    fn set_access_credential(&self, credential: Option<AccessCredential>);
}

/// Client-side navigation, owned by the presentation layer.
pub trait Navigator: Send + Sync {
    /// Navigate to the given route.
    fn navigate(&self, route: &str);
}

/// The user-facing failure notification surface (the toast widget,
/// abstracted).
pub trait Notifier: Send + Sync {
    /// Surface a failure message to the user.
    fn error(&self, message: &str);
}
