//! The authenticated identity.

use serde::{Deserialize, Serialize};

use super::Role;

/// The authenticated user's id, username and role.
///
/// Owned by the session store and immutable for the lifetime of a session;
/// a role change requires a new login. The same shape is mirrored into the
/// durable identity cache, which is a convenience hint only — never the
/// source of truth for a server-side decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Server-assigned numeric id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Authorization role.
    pub role: Role,
}

impl Identity {
    /// Create a new identity.
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips_field_for_field() {
        let identity = Identity::new(7, "siti", Role::Cashier);
        let json = serde_json::to_string(&identity).unwrap();
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn identity_decodes_wire_shape() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":3,"username":"budi","role":"admin"}"#).unwrap();
        assert_eq!(identity.id, 3);
        assert_eq!(identity.username, "budi");
        assert_eq!(identity.role, Role::Admin);
    }
}
