//! Delegated engine sub-actions — `quay up`, `down`, `ps`, `logs`, `pull`.
//!
//! Each resolves the layer plan, then hands the sub-action to the container
//! engine with inherited stdio. Positional arguments double as tags, so
//! `quay up webui` both activates the webui layer and asks the engine to
//! start that service.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::command_runner::CommandRunner;
use crate::compose::{ENGINE, Resolver};
use crate::compose::gpu::HostGpuProbe;
use crate::dispatch;

/// Arguments shared by the delegated sub-actions.
#[derive(Debug, Args, Default)]
pub struct DelegateArgs {
    /// Compose directory holding the layer files
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Services and flags forwarded to the engine sub-action
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// Run a delegated sub-action. Returns the child's exit code; a non-zero
/// code is a `Failed` outcome at the dispatch boundary, not an error.
///
/// # Errors
///
/// Returns an error if resolution fails or the engine cannot be spawned.
pub async fn run(app: &AppContext, action: &str, args: &DelegateArgs) -> Result<i32> {
    let dir = app.compose_dir(args.dir.as_deref())?;

    // Non-flag positionals are service names, which double as tags.
    let tags: Vec<String> = args
        .rest
        .iter()
        .filter(|arg| !arg.starts_with('-'))
        .cloned()
        .collect();

    let probe = HostGpuProbe::new(&app.runner);
    let plan = Resolver::new(&app.store, &probe).resolve(&dir, &tags).await?;

    let mut action_args = vec![action.to_string()];
    action_args.extend(args.rest.iter().cloned());
    let argv = plan.delegate_args(&action_args);
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

    let status = app.runner.run_status(ENGINE, &argv).await?;
    Ok(dispatch::status_code(&status))
}
