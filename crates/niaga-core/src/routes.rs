//! Per-navigation route authorization.
//!
//! The gate consumes session store state and decides, synchronously and
//! without network access, whether a destination renders or redirects.

use std::collections::{BTreeMap, BTreeSet};

use crate::session::{SessionState, SessionStore};
use crate::types::Role;

/// The login route.
pub const LOGIN_ROUTE: &str = "/login";

/// The default landing route, used for insufficient-privilege redirects.
pub const DEFAULT_ROUTE: &str = "/";

/// Who may view a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Viewable without a session.
    Public,
    /// Any authenticated identity.
    Authenticated,
    /// Only the listed roles.
    Restricted(BTreeSet<Role>),
}

impl RouteAccess {
    /// Restrict to the given roles.
    pub fn restricted(roles: impl IntoIterator<Item = Role>) -> Self {
        RouteAccess::Restricted(roles.into_iter().collect())
    }
}

/// The outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Boot resolution pending: render a neutral waiting indicator and
    /// make no redirect decision.
    Waiting,
    /// Render the destination.
    Render,
    /// Redirect to [`LOGIN_ROUTE`], discarding the attempted destination.
    RedirectToLogin,
    /// Redirect to [`DEFAULT_ROUTE`] due to insufficient privilege.
    RedirectToDefault,
}

impl RouteDecision {
    /// Returns the redirect target, if this decision is a redirect.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            RouteDecision::RedirectToLogin => Some(LOGIN_ROUTE),
            RouteDecision::RedirectToDefault => Some(DEFAULT_ROUTE),
            RouteDecision::Waiting | RouteDecision::Render => None,
        }
    }
}

/// Decide render vs redirect for one navigation.
///
/// Pure function of the session state and the destination's configured
/// access; re-evaluated on every navigation.
pub fn authorize(state: &SessionState, access: &RouteAccess) -> RouteDecision {
    // While initializing no routing decision may be made, whatever the
    // destination.
    if matches!(state, SessionState::Initializing) {
        return RouteDecision::Waiting;
    }

    match access {
        RouteAccess::Public => RouteDecision::Render,
        RouteAccess::Authenticated => match state {
            SessionState::Authenticated(_) => RouteDecision::Render,
            _ => RouteDecision::RedirectToLogin,
        },
        RouteAccess::Restricted(roles) => match state {
            SessionState::Authenticated(identity) if roles.contains(&identity.role) => {
                RouteDecision::Render
            }
            SessionState::Authenticated(_) => RouteDecision::RedirectToDefault,
            _ => RouteDecision::RedirectToLogin,
        },
    }
}

/// Static mapping from navigable path to its access declaration.
///
/// Configuration, not state: declared once at composition time and never
/// mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: BTreeMap<String, RouteAccess>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add a route declaration.
    pub fn with_route(mut self, path: impl Into<String>, access: RouteAccess) -> Self {
        self.entries.insert(path.into(), access);
        self
    }

    /// The application's route surface.
    pub fn standard() -> Self {
        use Role::{Admin, Cashier, Guest};

        let everyone = || RouteAccess::restricted([Admin, Cashier, Guest]);
        let back_office = || RouteAccess::restricted([Admin, Guest]);

        Self::new()
            .with_route(LOGIN_ROUTE, RouteAccess::Public)
            .with_route("/", everyone())
            .with_route("/kasir", everyone())
            .with_route("/profil", everyone())
            .with_route("/produk", back_office())
            .with_route("/stok", back_office())
            .with_route("/supplier", back_office())
            .with_route("/laporan/transaksi", back_office())
            .with_route("/kasbon", back_office())
            .with_route("/pengaturan", RouteAccess::restricted([Admin]))
    }

    /// Look up the access declaration for a path. Unknown paths require an
    /// authenticated identity with no role restriction.
    pub fn access(&self, path: &str) -> &RouteAccess {
        self.entries.get(path).unwrap_or(&RouteAccess::Authenticated)
    }

    /// Iterate over the declared routes.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RouteAccess)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Binds a read-only session store view to a route table for per-navigation
/// checks. Holds no state of its own.
#[derive(Debug, Clone)]
pub struct RouteGate {
    store: SessionStore,
    table: RouteTable,
}

impl RouteGate {
    /// Create a gate over the given store and table.
    pub fn new(store: SessionStore, table: RouteTable) -> Self {
        Self { store, table }
    }

    /// Decide render vs redirect for the given destination path.
    pub fn decide(&self, path: &str) -> RouteDecision {
        authorize(&self.store.state(), self.table.access(path))
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;

    fn authenticated(role: Role) -> SessionState {
        SessionState::Authenticated(Identity::new(1, "t", role))
    }

    #[test]
    fn initializing_always_waits() {
        let table = RouteTable::standard();
        for path in ["/", "/login", "/pengaturan", "/unknown"] {
            assert_eq!(
                authorize(&SessionState::Initializing, table.access(path)),
                RouteDecision::Waiting,
                "path {path}"
            );
        }
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        let table = RouteTable::standard();
        assert_eq!(
            authorize(&SessionState::Unauthenticated, table.access("/kasir")),
            RouteDecision::RedirectToLogin
        );
        // The login screen itself renders.
        assert_eq!(
            authorize(&SessionState::Unauthenticated, table.access("/login")),
            RouteDecision::Render
        );
    }

    #[test]
    fn cashier_cannot_view_settings() {
        let table = RouteTable::standard();
        let decision = authorize(&authenticated(Role::Cashier), table.access("/pengaturan"));
        assert_eq!(decision, RouteDecision::RedirectToDefault);
        assert_eq!(decision.redirect_target(), Some(DEFAULT_ROUTE));
    }

    #[test]
    fn cashier_views_register_and_dashboard() {
        let table = RouteTable::standard();
        assert_eq!(
            authorize(&authenticated(Role::Cashier), table.access("/kasir")),
            RouteDecision::Render
        );
        assert_eq!(
            authorize(&authenticated(Role::Cashier), table.access("/")),
            RouteDecision::Render
        );
    }

    #[test]
    fn guest_previews_back_office_but_not_settings() {
        let table = RouteTable::standard();
        assert_eq!(
            authorize(&authenticated(Role::Guest), table.access("/produk")),
            RouteDecision::Render
        );
        assert_eq!(
            authorize(&authenticated(Role::Guest), table.access("/pengaturan")),
            RouteDecision::RedirectToDefault
        );
    }

    #[test]
    fn admin_views_everything() {
        let table = RouteTable::standard();
        for (path, _) in table.entries() {
            assert_eq!(
                authorize(&authenticated(Role::Admin), table.access(path)),
                RouteDecision::Render,
                "path {path}"
            );
        }
    }

    #[test]
    fn unknown_paths_require_any_authenticated_identity() {
        let table = RouteTable::standard();
        assert_eq!(
            authorize(&authenticated(Role::Cashier), table.access("/nonexistent")),
            RouteDecision::Render
        );
        assert_eq!(
            authorize(&SessionState::Unauthenticated, table.access("/nonexistent")),
            RouteDecision::RedirectToLogin
        );
    }
}
