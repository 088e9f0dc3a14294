//! Local user store management.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use niaga_core::{ApiUrl, Role};
use niaga_file::FileBackend;

use crate::output;

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Create a user in the local store
    Add(UserAddArgs),
}

#[derive(Args, Debug)]
pub struct UserAddArgs {
    /// Login name
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Role: admin, cashier or guest
    #[arg(long)]
    pub role: Role,
}

pub async fn handle(api: ApiUrl, cmd: UserCommand) -> Result<()> {
    match cmd.command {
        UserSubcommand::Add(args) => add(api, args).await,
    }
}

async fn add(api: ApiUrl, args: UserAddArgs) -> Result<()> {
    if !api.is_local() {
        bail!("user management requires a local file:// store");
    }

    let root = api
        .to_file_path()
        .context("Failed to convert file:// URL to path")?;
    let backend = FileBackend::new(&root, api.clone());

    let identity = backend
        .create_user(&args.username, &args.password, args.role)
        .context("Failed to create user")?;

    output::success("User created");
    println!();
    output::field("User", &identity.username);
    output::field("Role", identity.role.as_str());

    Ok(())
}
