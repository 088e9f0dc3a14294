//! niaga-core - Session, authentication and route authorization for the
//! niaga point-of-sale administrative client.
//!
//! The crate is deliberately free of I/O: the network backend, the durable
//! identity cache and the presentation surfaces are reached through the
//! traits in [`traits`], so the session lifecycle can be driven and tested
//! without a server.

pub mod cache;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use cache::MemoryCache;
pub use credentials::{Credentials, PasswordChange};
pub use error::Error;
pub use gateway::AuthGateway;
pub use routes::{DEFAULT_ROUTE, LOGIN_ROUTE, RouteAccess, RouteDecision, RouteGate, RouteTable};
pub use session::{SessionState, SessionStatus, SessionStore};
pub use tokens::{AccessCredential, CsrfToken};
pub use traits::{AuthBackend, IdentityCache, LoginOutput, Navigator, Notifier, RequestDefaults};
pub use types::{ApiUrl, Identity, Role};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
