//! End-to-end tests spawning the CLI binary against an isolated local
//! user store and data directory.

use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI with an isolated HOME and data directory.
fn run_cli(args: &[&str], home: &Path, api: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_niaga"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("NIAGA_API", api);
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
fn run_cli_success(args: &[&str], home: &Path, api: &str) -> String {
    let output = run_cli(args, home, api);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn store_url(home: &Path) -> String {
    format!("file://{}", home.join("store").display())
}

#[test]
fn help_runs() {
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(&["--help"], home.path(), "http://127.0.0.1:8000/api");
    assert!(output.status.success());
}

#[test]
fn session_lifecycle_against_local_store() {
    let home = tempfile::tempdir().unwrap();
    let api = store_url(home.path());

    run_cli_success(
        &[
            "user", "add", "--username", "budi", "--password", "rahasia123", "--role", "admin",
        ],
        home.path(),
        &api,
    );

    let stdout = run_cli_success(
        &["login", "--username", "budi", "--password", "rahasia123"],
        home.path(),
        &api,
    );
    assert!(stdout.contains("Logged in"));
    assert!(stdout.contains("budi"));

    // The identity hint persists across processes.
    let stdout = run_cli_success(&["whoami"], home.path(), &api);
    assert!(stdout.contains("budi"));
    assert!(stdout.contains("admin"));

    // Admin renders the settings screen.
    let stdout = run_cli_success(&["open", "/pengaturan"], home.path(), &api);
    assert!(stdout.contains("render /pengaturan"));

    run_cli_success(&["logout"], home.path(), &api);

    // The session is gone.
    let output = run_cli(&["whoami"], home.path(), &api);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No active session"));
}

#[test]
fn cashier_is_redirected_from_settings() {
    let home = tempfile::tempdir().unwrap();
    let api = store_url(home.path());

    run_cli_success(
        &[
            "user", "add", "--username", "siti", "--password", "rahasia123", "--role", "cashier",
        ],
        home.path(),
        &api,
    );
    run_cli_success(
        &["login", "--username", "siti", "--password", "rahasia123"],
        home.path(),
        &api,
    );

    // Insufficient privilege lands on the default route.
    let stdout = run_cli_success(&["open", "/pengaturan"], home.path(), &api);
    assert!(stdout.contains("redirect"));
    assert!(stdout.contains("/"));

    // The register screen renders.
    let stdout = run_cli_success(&["open", "/kasir"], home.path(), &api);
    assert!(stdout.contains("render /kasir"));
}

#[test]
fn invalid_credentials_fail_without_session() {
    let home = tempfile::tempdir().unwrap();
    let api = store_url(home.path());

    run_cli_success(
        &[
            "user", "add", "--username", "budi", "--password", "rahasia123", "--role", "admin",
        ],
        home.path(),
        &api,
    );

    let output = run_cli(
        &["login", "--username", "budi", "--password", "salah"],
        home.path(),
        &api,
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid username or password."));

    let output = run_cli(&["whoami"], home.path(), &api);
    assert!(!output.status.success());
}

#[test]
fn boot_survives_unreachable_api() {
    let home = tempfile::tempdir().unwrap();

    // Nothing listens here; boot degrades and resolves unauthenticated.
    let output = run_cli(&["whoami"], home.path(), "http://127.0.0.1:9");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No active session"));
}

#[test]
fn unauthenticated_navigation_redirects_to_login() {
    let home = tempfile::tempdir().unwrap();
    let api = store_url(home.path());

    let stdout = run_cli_success(&["open", "/kasir"], home.path(), &api);
    assert!(stdout.contains("redirect"));
    assert!(stdout.contains("/login"));
}
