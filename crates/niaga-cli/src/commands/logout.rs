//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use niaga_core::ApiUrl;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(api: ApiUrl, _args: LogoutArgs) -> Result<()> {
    let app = session::boot(&api).await?;

    // Effective locally whatever the server says.
    app.gateway.logout().await;

    output::success("Logged out");
    Ok(())
}
