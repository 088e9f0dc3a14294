//! The authentication gateway: performs the network-facing handshake and
//! translates outcomes into session store transitions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::credentials::{Credentials, PasswordChange};
use crate::error::{AuthError, Error};
use crate::routes::{DEFAULT_ROUTE, LOGIN_ROUTE};
use crate::session::SessionStore;
use crate::traits::{AuthBackend, IdentityCache, Navigator, Notifier, RequestDefaults};
use crate::Result;

/// Orchestrates startup verification, login, logout and password change
/// against a backend, driving the [`SessionStore`] transitions.
///
/// Cheap to clone (internal `Arc`). All collaborators are injected at
/// construction; the gateway is the only component that mutates the
/// outgoing request defaults, and it always does so before issuing the
/// dependent request.
#[derive(Clone)]
pub struct AuthGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    backend: Arc<dyn AuthBackend>,
    defaults: Arc<dyn RequestDefaults>,
    store: SessionStore,
    cache: Arc<dyn IdentityCache>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    ready: AtomicBool,
    login_in_flight: AtomicBool,
}

impl AuthGateway {
    /// Create a gateway over the given collaborators.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        defaults: Arc<dyn RequestDefaults>,
        store: SessionStore,
        cache: Arc<dyn IdentityCache>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                backend,
                defaults,
                store,
                cache,
                navigator,
                notifier,
                ready: AtomicBool::new(false),
                login_in_flight: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the session store this gateway drives.
    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    /// Returns true once the startup sequence has completed.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// The startup sequence, run once at process boot.
    ///
    /// Fetches an anti-forgery token (failure is tolerated: mutating calls
    /// will fail until the user retries, nothing is retried here), attaches
    /// it to the outgoing request defaults, inspects the durable cache for
    /// a previously cached identity, and resolves the session store. The
    /// cached identity is a hint only and is not re-validated against the
    /// server.
    ///
    /// Never fails: every degradation path ends in a resolved store, so
    /// render gating on the store's status always leaves `initializing`.
    #[instrument(skip(self))]
    pub async fn startup(&self) {
        match self.inner.backend.fetch_csrf_token().await {
            Ok(token) => self.inner.defaults.set_csrf_token(Some(token)),
            Err(e) => {
                warn!(error = %e, "anti-forgery token fetch failed; mutating requests will be rejected until retried");
            }
        }

        let cached = match self.inner.cache.load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "identity cache unreadable; starting unauthenticated");
                None
            }
        };

        self.inner.store.resolve(cached);
        self.inner.ready.store(true, Ordering::SeqCst);
        debug!("startup sequence complete");
    }

    /// Exchange credentials for a session.
    ///
    /// Re-fetches the anti-forgery token immediately before submitting,
    /// since tokens may rotate between boot and submission. On success the
    /// access credential is attached to the request defaults, the identity
    /// is attached to the store (and mirrored to the durable cache), and
    /// navigation lands on the default route.
    ///
    /// On failure the store is untouched and exactly one user-visible
    /// notification is emitted; the error is also returned, already
    /// handled, for callers that need an exit status. A second submission
    /// while one is in flight is rejected with
    /// [`AuthError::LoginInProgress`] and not notified — the first attempt
    /// reports its own outcome.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        if self.inner.login_in_flight.swap(true, Ordering::SeqCst) {
            return Err(AuthError::LoginInProgress.into());
        }

        let result = self.login_inner(username, password).await;
        self.inner.login_in_flight.store(false, Ordering::SeqCst);

        if let Err(ref e) = result {
            warn!(error = %e, "login failed");
            self.inner.notifier.error(&login_failure_message(e));
        }
        result
    }

    async fn login_inner(&self, username: &str, password: &str) -> Result<()> {
        let token = self.inner.backend.fetch_csrf_token().await?;
        self.inner.defaults.set_csrf_token(Some(token));

        let credentials = Credentials::new(username, password);
        let output = self.inner.backend.login(credentials).await?;

        info!(username = %output.identity.username, role = %output.identity.role, "login succeeded");
        self.inner
            .defaults
            .set_access_credential(Some(output.access_credential));
        self.inner.store.set_authenticated(output.identity);
        self.inner.navigator.navigate(DEFAULT_ROUTE);
        Ok(())
    }

    /// Tear the session down.
    ///
    /// The server-side call is attempted, but its outcome is irrelevant to
    /// the local result: the store is cleared (purging the durable cache
    /// and both request defaults) and navigation lands on the login route
    /// regardless. A user is never left locally "logged in" because the
    /// network failed.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.inner.backend.logout().await {
            warn!(error = %e, "server-side logout failed; clearing local session anyway");
        }

        self.inner.store.clear();
        self.inner.navigator.navigate(LOGIN_ROUTE);
        info!("session cleared");
    }

    /// Change the account password over the authenticated pipeline.
    ///
    /// Owned by the profile surface; validation failures propagate to the
    /// caller rather than through the notifier.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: PasswordChange) -> Result<()> {
        self.inner.backend.change_password(&change).await
    }
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("ready", &self.is_ready())
            .field("store", &self.inner.store)
            .finish()
    }
}

/// Map a login failure to the single user-facing message it surfaces as.
fn login_failure_message(err: &Error) -> String {
    match err {
        Error::Auth(AuthError::InvalidCredentials(_)) => {
            "Invalid username or password.".to_string()
        }
        Error::Protocol(p) if p.is_auth_error() => "Invalid username or password.".to_string(),
        Error::Protocol(p) if p.is_csrf_rejection() => {
            "The session token expired. Please try again.".to_string()
        }
        Error::Transport(_) => "Could not reach the server. Check your connection.".to_string(),
        other => format!("Login failed: {}", other),
    }
}
