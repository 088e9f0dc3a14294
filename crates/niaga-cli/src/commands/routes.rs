//! Routes command: print the route surface.

use anyhow::Result;
use clap::Args;

use niaga_core::{ApiUrl, RouteAccess, RouteTable};

use crate::output;

#[derive(Args, Debug)]
pub struct RoutesArgs {}

pub async fn run(_api: ApiUrl, _args: RoutesArgs) -> Result<()> {
    let table = RouteTable::standard();

    for (path, access) in table.entries() {
        let roles = match access {
            RouteAccess::Public => "public".to_string(),
            RouteAccess::Authenticated => "any authenticated".to_string(),
            RouteAccess::Restricted(roles) => roles
                .iter()
                .map(|role| role.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        output::field(path, &roles);
    }

    Ok(())
}
