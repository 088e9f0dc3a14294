//! Composition of the session subsystem for CLI use.
//!
//! Every collaborator is passed explicitly: backend chosen by URL scheme,
//! durable identity cache in the platform data directory, navigation and
//! notification printed to the terminal.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use niaga_core::traits::{AuthBackend, IdentityCache, Navigator, Notifier, RequestDefaults};
use niaga_core::{ApiUrl, AuthGateway, RouteGate, RouteTable, SessionStore};
use niaga_file::FileBackend;
use niaga_http::HttpBackend;

use crate::output;

/// Default API base when neither `--api` nor `NIAGA_API` is set.
const DEFAULT_API: &str = "http://127.0.0.1:8000/api";

/// The composed session subsystem.
pub struct App {
    pub gateway: AuthGateway,
    pub gate: RouteGate,
}

/// Resolve the API base URL: flag, then environment, then default.
pub fn resolve_api(flag: Option<&str>) -> Result<ApiUrl> {
    let value = match flag {
        Some(value) => value.to_string(),
        None => std::env::var("NIAGA_API").unwrap_or_else(|_| DEFAULT_API.to_string()),
    };
    ApiUrl::new(&value).context("Invalid API URL")
}

/// Build the store, gateway and gate for the given API.
pub fn build(api: &ApiUrl) -> Result<App> {
    let cache: Arc<dyn IdentityCache> = Arc::new(storage::FileIdentityCache::at_data_dir()?);
    let (backend, defaults) = backend_for(api)?;

    let store = SessionStore::new(cache.clone(), defaults.clone());
    let gate = RouteGate::new(store.clone(), RouteTable::standard());
    let gateway = AuthGateway::new(
        backend,
        defaults,
        store,
        cache,
        Arc::new(CliNavigator),
        Arc::new(CliNotifier),
    );

    Ok(App { gateway, gate })
}

/// Build and run the boot sequence; routing decisions are valid afterwards.
pub async fn boot(api: &ApiUrl) -> Result<App> {
    let app = build(api)?;
    app.gateway.startup().await;
    Ok(app)
}

fn backend_for(api: &ApiUrl) -> Result<(Arc<dyn AuthBackend>, Arc<dyn RequestDefaults>)> {
    if api.is_local() {
        let root = api
            .to_file_path()
            .context("Failed to convert file:// URL to path")?;
        tracing::debug!(root = %root.display(), "using local user store");
        let backend = Arc::new(FileBackend::new(&root, api.clone()));
        Ok((backend.clone(), backend))
    } else {
        tracing::debug!(api = %api, "using HTTP backend");
        let backend = Arc::new(HttpBackend::new(api.clone()));
        Ok((backend.clone(), backend))
    }
}

/// Terminal navigation: prints where the client would land.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: &str) {
        println!("{} {}", "→".dimmed(), route);
    }
}

/// Terminal notification surface standing in for the toast widget.
struct CliNotifier;

impl Notifier for CliNotifier {
    fn error(&self, message: &str) {
        output::error(message);
    }
}
