//! File-backed authentication implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use niaga_core::error::{AuthError, Error, InvalidInputError};
use niaga_core::traits::{AuthBackend, LoginOutput, RequestDefaults};
use niaga_core::{
    AccessCredential, ApiUrl, Credentials, CsrfToken, Identity, PasswordChange, Result, Role,
};

use crate::store::{FileStore, LocalUser};

/// Filesystem-backed authentication for offline development and tests.
///
/// The access credential encodes the account reference and current
/// password hash, so it stays verifiable without any server-side session
/// state; it is invalidated naturally by a password change.
#[derive(Debug, Clone)]
pub struct FileBackend {
    store: FileStore,
    url: ApiUrl,
    credential: Arc<RwLock<Option<AccessCredential>>>,
}

impl FileBackend {
    /// Create a backend over the store directory of a `file://` URL.
    pub fn new(root: impl AsRef<std::path::Path>, url: ApiUrl) -> Self {
        Self {
            store: FileStore::new(root),
            url,
            credential: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the API URL for this instance.
    pub fn url(&self) -> &ApiUrl {
        &self.url
    }

    /// Access the underlying store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Create a user with a freshly hashed password.
    pub fn create_user(&self, username: &str, password: &str, role: Role) -> Result<Identity> {
        let password_hash = hash(password, DEFAULT_COST).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        let user = self.store.create_user(username, &password_hash, role)?;
        Ok(identity_of(&user))
    }

    fn make_credential(user: &LocalUser) -> AccessCredential {
        let credential = json!({
            "username": user.username,
            "password_hash": user.password_hash,
        })
        .to_string();
        AccessCredential::new(credential)
    }

    fn parse_credential(credential: &AccessCredential) -> Result<(String, String)> {
        let value: serde_json::Value =
            serde_json::from_str(credential.as_str()).map_err(|e| {
                Error::InvalidInput(InvalidInputError::Other {
                    message: format!("invalid credential JSON: {}", e),
                })
            })?;

        let username = value
            .get("username")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::InvalidInput(InvalidInputError::Other {
                    message: "credential missing 'username'".to_string(),
                })
            })?;

        let password_hash = value
            .get("password_hash")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::InvalidInput(InvalidInputError::Other {
                    message: "credential missing 'password_hash'".to_string(),
                })
            })?;

        Ok((username.to_string(), password_hash.to_string()))
    }

    /// Resolve and verify the attached credential against the store.
    fn authenticated_user(&self) -> Result<LocalUser> {
        let credential = self
            .credential
            .read()
            .unwrap()
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;

        let (username, password_hash) = Self::parse_credential(&credential)?;
        let user = self
            .store
            .find_user(&username)?
            .ok_or_else(|| AuthError::InvalidCredentials("account not found".to_string()))?;

        if user.password_hash != password_hash {
            return Err(AuthError::InvalidCredentials("credential revoked".to_string()).into());
        }

        Ok(user)
    }
}

fn identity_of(user: &LocalUser) -> Identity {
    Identity::new(user.id, user.username.clone(), user.role)
}

#[async_trait]
impl AuthBackend for FileBackend {
    async fn fetch_csrf_token(&self) -> Result<CsrfToken> {
        // No forgery surface locally; issue a random token so the pipeline
        // behaves the same as against a server.
        Ok(CsrfToken::new(Uuid::new_v4().to_string()))
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn login(&self, credentials: Credentials) -> Result<LoginOutput> {
        let user = self
            .store
            .find_user(credentials.username())?
            .ok_or_else(|| AuthError::InvalidCredentials("account not found".to_string()))?;

        let ok = verify(credentials.password(), &user.password_hash).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        if !ok {
            return Err(AuthError::InvalidCredentials("invalid password".to_string()).into());
        }

        debug!(username = %user.username, "local login verified");
        Ok(LoginOutput {
            access_credential: Self::make_credential(&user),
            identity: identity_of(&user),
        })
    }

    async fn logout(&self) -> Result<()> {
        // Nothing to invalidate locally; the caller clears the pipeline.
        Ok(())
    }

    #[instrument(skip(self, change))]
    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        if change.new_password() != change.new_password_confirm() {
            return Err(InvalidInputError::PasswordChange {
                message: "new passwords do not match".to_string(),
            }
            .into());
        }

        let user = self.authenticated_user()?;

        let ok = verify(change.old_password(), &user.password_hash).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;
        if !ok {
            return Err(AuthError::InvalidCredentials("old password incorrect".to_string()).into());
        }

        let new_hash = hash(change.new_password(), DEFAULT_COST).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;
        self.store
            .update_password_hash(&user.username, &new_hash)?;

        // Re-issue the credential against the new hash so the session
        // survives its own password change.
        let user = self
            .store
            .find_user(&user.username)?
            .ok_or_else(|| AuthError::InvalidCredentials("account not found".to_string()))?;
        *self.credential.write().unwrap() = Some(Self::make_credential(&user));
        Ok(())
    }
}

impl RequestDefaults for FileBackend {
    fn set_csrf_token(&self, _token: Option<CsrfToken>) {
        // Anti-forgery tokens are meaningless without a remote server;
        // accepted and dropped so composition stays uniform.
    }

    fn set_access_credential(&self, credential: Option<AccessCredential>) {
        *self.credential.write().unwrap() = credential;
    }
}
