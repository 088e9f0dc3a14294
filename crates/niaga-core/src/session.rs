//! The session store: single source of truth for "who is logged in" and
//! "is the app ready to make an authorization decision".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, error, warn};

use crate::traits::{IdentityCache, RequestDefaults};
use crate::types::Identity;

/// The flat session status, observed per navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Boot-time identity resolution has not completed. The sole entry
    /// state; once left it is never re-entered without a full reload.
    Initializing,
    /// No authenticated identity.
    Unauthenticated,
    /// An identity is attached.
    Authenticated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Initializing => "initializing",
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Authenticated => "authenticated",
        };
        f.write_str(s)
    }
}

/// The session state. The authenticated variant carries the identity, so
/// "authenticated with no identity" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Boot-time resolution pending.
    Initializing,
    /// No session.
    Unauthenticated,
    /// Logged in as the carried identity.
    Authenticated(Identity),
}

impl SessionState {
    /// Returns the flat status discriminant.
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Initializing => SessionStatus::Initializing,
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    /// Returns the attached identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// The owned session state container.
///
/// Cheap to clone (internal `Arc`) and safe to share; reads take a
/// snapshot and the lock is never held across an await point. All writes
/// are driven by the authentication gateway — the four operations below
/// are the complete transition set, there is no raw field mutation.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<SessionState>,
    resolved: AtomicBool,
    cache: Arc<dyn IdentityCache>,
    defaults: Arc<dyn RequestDefaults>,
}

impl SessionStore {
    /// Create a store in the `Initializing` state.
    pub fn new(cache: Arc<dyn IdentityCache>, defaults: Arc<dyn RequestDefaults>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(SessionState::Initializing),
                resolved: AtomicBool::new(false),
                cache,
                defaults,
            }),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.read().unwrap().clone()
    }

    /// Returns the flat status.
    pub fn status(&self) -> SessionStatus {
        self.inner.state.read().unwrap().status()
    }

    /// Returns the attached identity, if authenticated.
    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.read().unwrap().identity().cloned()
    }

    /// One-shot boot resolution, called by the authentication gateway once
    /// startup verification has completed.
    ///
    /// A second call indicates a composition defect: it is ignored and
    /// logged at error level, leaving the state untouched.
    pub fn resolve(&self, identity: Option<Identity>) {
        if self.inner.resolved.swap(true, Ordering::SeqCst) {
            error!("session already resolved; ignoring duplicate boot resolution");
            return;
        }

        let next = match identity {
            Some(identity) => {
                debug!(username = %identity.username, "resolved session from cached identity");
                SessionState::Authenticated(identity)
            }
            None => {
                debug!("resolved session with no identity");
                SessionState::Unauthenticated
            }
        };

        *self.inner.state.write().unwrap() = next;
    }

    /// Attach an authenticated identity, from any state, and persist it to
    /// the durable cache.
    ///
    /// The cache is a convenience mirror: a failed write is logged and the
    /// in-memory session proceeds regardless.
    pub fn set_authenticated(&self, identity: Identity) {
        if let Err(e) = self.inner.cache.store(&identity) {
            warn!(error = %e, "failed to persist identity to durable cache");
        }
        *self.inner.state.write().unwrap() = SessionState::Authenticated(identity);
    }

    /// Tear the session down unconditionally: transition to
    /// `Unauthenticated`, purge the durable cache and drop both outgoing
    /// request defaults (anti-forgery token and access credential).
    ///
    /// Idempotent; succeeds even when no session existed.
    pub fn clear(&self) {
        if let Err(e) = self.inner.cache.clear() {
            warn!(error = %e, "failed to purge durable identity cache");
        }
        self.inner.defaults.set_csrf_token(None);
        self.inner.defaults.set_access_credential(None);
        *self.inner.state.write().unwrap() = SessionState::Unauthenticated;
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish()
    }
}
