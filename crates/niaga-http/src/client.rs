//! HTTP client with the outgoing request pipeline defaults.

use std::sync::{Arc, RwLock};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, trace};

use niaga_core::error::{Error, ProtocolError, TransportError};
use niaga_core::{AccessCredential, ApiUrl, CsrfToken, RequestDefaults};

use crate::endpoints::ApiErrorResponse;

/// Header carrying the anti-forgery token on mutating requests.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Map a reqwest failure into the transport taxonomy.
fn map_transport(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// HTTP client for the backing API.
///
/// Owns the process-wide request defaults: the anti-forgery token is sent
/// with every mutating request, the access credential as a bearer header
/// on every request once attached. Cheap to clone; clones share the
/// defaults.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base: ApiUrl,
    csrf: RwLock<Option<CsrfToken>>,
    credential: RwLock<Option<AccessCredential>>,
}

impl ApiClient {
    /// Create a new client for the given API base URL.
    pub fn new(base: ApiUrl) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("niaga/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(ClientInner {
                http,
                base,
                csrf: RwLock::new(None),
                credential: RwLock::new(None),
            }),
        }
    }

    /// Returns the API base URL this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.inner.base
    }

    /// Make a non-mutating GET request.
    #[instrument(skip(self), fields(base = %self.inner.base))]
    pub async fn get<R>(&self, path: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.inner.base.endpoint(path);
        debug!(path, "GET");

        let response = self
            .inner
            .http
            .get(&url)
            .headers(self.read_headers())
            .send()
            .await
            .map_err(map_transport)?;

        self.handle_response(response).await
    }

    /// Make a mutating POST request with a JSON body.
    #[instrument(skip(self, body), fields(base = %self.inner.base))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.inner.base.endpoint(path);
        debug!(path, "POST");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .headers(self.write_headers())
            .send()
            .await
            .map_err(map_transport)?;

        self.handle_response(response).await
    }

    /// Make a mutating POST request whose response body is ignored.
    #[instrument(skip(self, body), fields(base = %self.inner.base))]
    pub async fn post_no_response<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize,
    {
        let url = self.inner.base.endpoint(path);
        debug!(path, "POST (no response)");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .headers(self.write_headers())
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error = self.parse_error_response(response).await;
            Err(Error::Protocol(error))
        }
    }

    /// Headers for non-mutating requests: bearer credential when attached.
    fn read_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.attach_credential(&mut headers);
        headers
    }

    /// Headers for mutating requests: anti-forgery token plus bearer
    /// credential, whichever are attached.
    fn write_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(ref token) = *self.inner.csrf.read().unwrap() {
            if let Ok(value) = HeaderValue::from_str(token.as_str()) {
                headers.insert(CSRF_HEADER, value);
            }
        }
        self.attach_credential(&mut headers);
        headers
    }

    fn attach_credential(&self, headers: &mut HeaderMap) {
        if let Some(ref credential) = *self.inner.credential.read().unwrap() {
            let value = format!("Bearer {}", credential.as_str());
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(AUTHORIZATION, value);
            }
        }
    }

    /// Handle a response, parsing the body or the error shape.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            let body = response.json::<R>().await.map_err(map_transport)?;
            Ok(body)
        } else {
            let error = self.parse_error_response(response).await;
            Err(Error::Protocol(error))
        }
    }

    /// Parse an error response body into a protocol error.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error, body.message.or(body.detail)),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}

impl RequestDefaults for ApiClient {
    fn set_csrf_token(&self, token: Option<CsrfToken>) {
        *self.inner.csrf.write().unwrap() = token;
    }

    fn set_access_credential(&self, credential: Option<AccessCredential>) {
        *self.inner.credential.write().unwrap() = credential;
    }
}
