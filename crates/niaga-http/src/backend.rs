//! Network-backed authentication implementation.

use async_trait::async_trait;
use tracing::{debug, instrument};

use niaga_core::traits::{AuthBackend, LoginOutput, RequestDefaults};
use niaga_core::{AccessCredential, ApiUrl, Credentials, CsrfToken, PasswordChange, Result};

use crate::client::ApiClient;
use crate::endpoints::{
    CsrfTokenResponse, LoginRequest, LoginResponse, PasswordChangeRequest, CSRF_TOKEN, LOGIN,
    LOGOUT, PASSWORD_CHANGE,
};

/// Authentication backend over the consumed HTTP contracts.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    /// Create a backend for the given API base URL.
    pub fn new(base: ApiUrl) -> Self {
        Self {
            client: ApiClient::new(base),
        }
    }

    /// Returns the underlying client, which carries the request defaults.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    #[instrument(skip(self), fields(base = %self.client.base()))]
    async fn fetch_csrf_token(&self) -> Result<CsrfToken> {
        debug!("fetching anti-forgery token");
        let response: CsrfTokenResponse = self.client.get(CSRF_TOKEN).await?;
        Ok(CsrfToken::new(response.csrf_token))
    }

    #[instrument(skip(self, credentials), fields(base = %self.client.base(), username = %credentials.username()))]
    async fn login(&self, credentials: Credentials) -> Result<LoginOutput> {
        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response: LoginResponse = self.client.post(LOGIN, &request).await?;
        debug!(username = %response.identity.username, "credential exchange succeeded");

        Ok(LoginOutput {
            access_credential: AccessCredential::new(response.access_credential),
            identity: response.identity,
        })
    }

    #[instrument(skip(self), fields(base = %self.client.base()))]
    async fn logout(&self) -> Result<()> {
        // The response body is ignored either way.
        self.client
            .post_no_response(LOGOUT, &serde_json::json!({}))
            .await
    }

    #[instrument(skip(self, change), fields(base = %self.client.base()))]
    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        let request = PasswordChangeRequest {
            old_password: change.old_password(),
            new_password: change.new_password(),
            new_password_confirm: change.new_password_confirm(),
        };

        self.client.post_no_response(PASSWORD_CHANGE, &request).await
    }
}

// The backend and its client are the same pipeline; composition code that
// holds the backend as a trait object attaches defaults through this.
impl RequestDefaults for HttpBackend {
    fn set_csrf_token(&self, token: Option<CsrfToken>) {
        self.client.set_csrf_token(token);
    }

    fn set_access_credential(&self, credential: Option<AccessCredential>) {
        self.client.set_access_credential(credential);
    }
}
