//! `quay tunnel` — expose a service through a public URL, or stop all
//! tunnel sessions.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::tunnel::{self, PollOptions};

/// Arguments for the tunnel command.
#[derive(Debug, Args)]
pub struct TunnelArgs {
    /// Service handle to expose, or `down`/`stop` to stop all sessions
    pub handle: String,
}

/// Run `quay tunnel <handle>` / `quay tunnel down`.
///
/// # Errors
///
/// Returns an error if the endpoint cannot be derived, the tunnel process
/// fails to start or vanishes, or no URL appears within the bound.
pub async fn run(app: &AppContext, args: &TunnelArgs) -> Result<()> {
    if matches!(args.handle.as_str(), "down" | "stop") {
        let stopped = tunnel::teardown_all(&app.runner).await?;
        if stopped == 0 {
            app.output.info("No tunnel sessions found.");
        } else {
            app.output
                .success(&format!("Stopped {stopped} tunnel session(s)."));
        }
        return Ok(());
    }

    let session = tunnel::expose(
        &app.runner,
        &app.store,
        &app.output,
        &args.handle,
        PollOptions::default(),
    )
    .await?;

    // The session container stays up — that IS the tunnel.
    if let Some(url) = &session.public_url {
        println!("{url}");
    }
    app.output.kv("Stop", "quay tunnel down");
    Ok(())
}
