//! Open command: print the route authorization decision for a path.

use anyhow::Result;
use clap::Args;

use niaga_core::{ApiUrl, RouteDecision};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Destination path, e.g. /produk
    pub path: String,
}

pub async fn run(api: ApiUrl, args: OpenArgs) -> Result<()> {
    let app = session::boot(&api).await?;

    match app.gate.decide(&args.path) {
        RouteDecision::Waiting => {
            // Unreachable after the boot sequence, but the gate contract
            // includes it.
            output::field("decision", "waiting");
        }
        RouteDecision::Render => {
            output::success(&format!("render {}", args.path));
        }
        decision @ (RouteDecision::RedirectToLogin | RouteDecision::RedirectToDefault) => {
            if let Some(target) = decision.redirect_target() {
                output::field("redirect", target);
            }
        }
    }

    Ok(())
}
