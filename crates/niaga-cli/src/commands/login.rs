//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use niaga_core::ApiUrl;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username to authenticate with
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(api: ApiUrl, args: LoginArgs) -> Result<()> {
    let app = session::boot(&api).await?;

    eprintln!("{}", "Logging in...".dimmed());

    if app
        .gateway
        .login(&args.username, &args.password)
        .await
        .is_err()
    {
        // The failure has already been surfaced through the notifier.
        std::process::exit(1);
    }

    let identity = app
        .gateway
        .store()
        .identity()
        .context("Session missing after login")?;

    output::success("Logged in");
    println!();
    output::field("User", &identity.username);
    output::field("Role", identity.role.as_str());

    Ok(())
}
