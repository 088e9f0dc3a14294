//! Mock API tests for the HTTP backend.
//!
//! These use wiremock to simulate the backing API and drive the full
//! session lifecycle without a real server or credentials.

use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use niaga_core::traits::{Navigator, Notifier};
use niaga_core::{
    ApiUrl, AuthGateway, IdentityCache, MemoryCache, SessionStatus, SessionStore,
};
use niaga_http::HttpBackend;

/// Helper to create an API URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    gateway: AuthGateway,
    cache: Arc<MemoryCache>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(api: ApiUrl) -> Harness {
    let backend = Arc::new(HttpBackend::new(api));
    let cache = Arc::new(MemoryCache::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let store = SessionStore::new(cache.clone(), backend.clone());
    let gateway = AuthGateway::new(
        backend.clone(),
        backend,
        store,
        cache.clone(),
        navigator.clone(),
        notifier.clone(),
    );

    Harness {
        gateway,
        cache,
        navigator,
        notifier,
    }
}

fn mount_csrf(body: &str) -> Mock {
    Mock::given(method("GET"))
        .and(path("/auth/csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrfToken": body })))
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn startup_with_unreachable_server_ends_unauthenticated() {
    // Nothing is listening on this port.
    let api = ApiUrl::new("http://127.0.0.1:9").unwrap();
    let h = harness(api);

    h.gateway.startup().await;

    assert_eq!(h.gateway.store().status(), SessionStatus::Unauthenticated);
    assert!(h.gateway.is_ready());
}

#[tokio::test]
async fn startup_resolves_cached_identity_without_revalidation() {
    let server = MockServer::start().await;
    mount_csrf("boot-token").mount(&server).await;

    let h = harness(mock_api_url(&server));
    let cached: niaga_core::Identity =
        serde_json::from_value(json!({ "id": 3, "username": "budi", "role": "admin" })).unwrap();
    h.cache.store(&cached).unwrap();

    h.gateway.startup().await;

    assert_eq!(h.gateway.store().status(), SessionStatus::Authenticated);
    assert_eq!(h.gateway.store().identity().unwrap().username, "budi");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_submits_rotated_token_and_attaches_credential() {
    let server = MockServer::start().await;

    // The boot token is fetched once, then a rotated token immediately
    // before credential submission.
    mount_csrf("boot-token")
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("X-CSRFToken", "login-token"))
        .and(body_json(json!({
            "username": "siti",
            "password": "rahasia123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessCredential": "cred-abc",
            "identity": { "id": 7, "username": "siti", "role": "cashier" }
        })))
        .mount(&server)
        .await;

    let h = harness(mock_api_url(&server));
    h.gateway.startup().await;

    mount_csrf("login-token").mount(&server).await;
    h.gateway.login("siti", "rahasia123").await.unwrap();

    assert_eq!(h.gateway.store().status(), SessionStatus::Authenticated);
    assert_eq!(h.cache.load().unwrap().unwrap().username, "siti");
    assert_eq!(h.navigator.routes.lock().unwrap().last().unwrap(), "/");
}

#[tokio::test]
async fn login_invalid_credentials_notifies_and_leaves_store() {
    let server = MockServer::start().await;
    mount_csrf("boot-token").mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Username atau password salah."
        })))
        .mount(&server)
        .await;

    let h = harness(mock_api_url(&server));
    h.gateway.startup().await;

    let result = h.gateway.login("siti", "salah").await;

    assert!(result.is_err());
    assert_eq!(h.gateway.store().status(), SessionStatus::Unauthenticated);
    assert!(h.cache.load().unwrap().is_none());
    let messages = h.notifier.messages.lock().unwrap();
    assert_eq!(messages.as_slice(), ["Invalid username or password."]);
}

#[tokio::test]
async fn login_with_stale_token_reports_recoverable_failure() {
    let server = MockServer::start().await;
    mount_csrf("stale-token").mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "CSRF Failed: token incorrect."
        })))
        .mount(&server)
        .await;

    let h = harness(mock_api_url(&server));
    h.gateway.startup().await;

    let result = h.gateway.login("siti", "rahasia123").await;

    assert!(result.is_err());
    assert_eq!(h.gateway.store().status(), SessionStatus::Unauthenticated);
    let messages = h.notifier.messages.lock().unwrap();
    assert_eq!(
        messages.as_slice(),
        ["The session token expired. Please try again."]
    );
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn logout_clears_locally_when_server_errors() {
    let server = MockServer::start().await;
    mount_csrf("boot-token").mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessCredential": "cred-abc",
            "identity": { "id": 7, "username": "siti", "role": "cashier" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(mock_api_url(&server));
    h.gateway.startup().await;
    h.gateway.login("siti", "rahasia123").await.unwrap();

    h.gateway.logout().await;

    assert_eq!(h.gateway.store().status(), SessionStatus::Unauthenticated);
    assert!(h.gateway.store().identity().is_none());
    assert!(h.cache.load().unwrap().is_none());
    assert_eq!(h.navigator.routes.lock().unwrap().last().unwrap(), "/login");
    // Logout failures are absorbed, never surfaced.
    assert!(h.notifier.messages.lock().unwrap().is_empty());
}

// ============================================================================
// Password change pipeline
// ============================================================================

#[tokio::test]
async fn password_change_rides_the_authenticated_pipeline() {
    let server = MockServer::start().await;
    mount_csrf("boot-token").mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessCredential": "cred-abc",
            "identity": { "id": 3, "username": "budi", "role": "admin" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/password/change"))
        .and(header("Authorization", "Bearer cred-abc"))
        .and(header("X-CSRFToken", "boot-token"))
        .and(body_json(json!({
            "oldPassword": "rahasia123",
            "newPassword": "rahasia456",
            "newPasswordConfirm": "rahasia456"
        })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let h = harness(mock_api_url(&server));
    h.gateway.startup().await;
    h.gateway.login("budi", "rahasia123").await.unwrap();

    h.gateway
        .change_password(niaga_core::PasswordChange::new(
            "rahasia123",
            "rahasia456",
            "rahasia456",
        ))
        .await
        .unwrap();
}
