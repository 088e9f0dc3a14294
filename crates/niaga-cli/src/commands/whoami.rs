//! Whoami command implementation.

use anyhow::{bail, Result};
use clap::Args;

use niaga_core::{ApiUrl, SessionState};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(api: ApiUrl, _args: WhoamiArgs) -> Result<()> {
    let app = session::boot(&api).await?;

    match app.gateway.store().state() {
        SessionState::Authenticated(identity) => {
            output::field("User", &identity.username);
            output::field("Role", identity.role.as_str());
            Ok(())
        }
        _ => bail!("No active session. Run 'niaga login' first."),
    }
}
