//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{change_password, login, logout, open, routes, user, whoami};

/// Administrative shell for the niaga point-of-sale client.
#[derive(Parser, Debug)]
#[command(name = "niaga")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL (falls back to NIAGA_API, then http://127.0.0.1:8000/api)
    #[arg(long, global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a session (login)
    Login(login::LoginArgs),

    /// End the session; effective locally even when the server is down
    Logout(logout::LogoutArgs),

    /// Display the current identity
    Whoami(whoami::WhoamiArgs),

    /// Run the boot sequence and print the routing decision for a path
    Open(open::OpenArgs),

    /// Change the account password
    ChangePassword(change_password::ChangePasswordArgs),

    /// List the route surface and the roles each path requires
    Routes(routes::RoutesArgs),

    /// Local user store management (file:// APIs only)
    User(user::UserCommand),
}
