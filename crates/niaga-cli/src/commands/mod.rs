//! Command implementations.

pub mod change_password;
pub mod login;
pub mod logout;
pub mod open;
pub mod routes;
pub mod user;
pub mod whoami;

use anyhow::Result;

use niaga_core::ApiUrl;

use crate::cli::Commands;

pub async fn handle(api: ApiUrl, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Login(args) => login::run(api, args).await,
        Commands::Logout(args) => logout::run(api, args).await,
        Commands::Whoami(args) => whoami::run(api, args).await,
        Commands::Open(args) => open::run(api, args).await,
        Commands::ChangePassword(args) => change_password::run(api, args).await,
        Commands::Routes(args) => routes::run(api, args).await,
        Commands::User(cmd) => user::handle(api, cmd).await,
    }
}
