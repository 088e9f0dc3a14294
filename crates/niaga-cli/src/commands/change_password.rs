//! Change-password command implementation.

use anyhow::{Context, Result};
use clap::Args;

use niaga_core::{ApiUrl, PasswordChange};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ChangePasswordArgs {
    /// Username to authenticate with
    #[arg(long)]
    pub username: String,

    /// Current account password
    #[arg(long)]
    pub password: String,

    /// The new password
    #[arg(long)]
    pub new_password: String,

    /// Confirmation entry; defaults to the new password
    #[arg(long)]
    pub confirm_password: Option<String>,
}

pub async fn run(api: ApiUrl, args: ChangePasswordArgs) -> Result<()> {
    let app = session::boot(&api).await?;

    if app
        .gateway
        .login(&args.username, &args.password)
        .await
        .is_err()
    {
        // The failure has already been surfaced through the notifier.
        std::process::exit(1);
    }

    let confirm = args
        .confirm_password
        .as_deref()
        .unwrap_or(&args.new_password);
    let change = PasswordChange::new(&args.password, &args.new_password, confirm);

    app.gateway
        .change_password(change)
        .await
        .context("Failed to change password")?;

    output::success("Password changed");
    Ok(())
}
