//! `quay cmd` — print the assembled delegate command for the active tags.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::compose::Resolver;
use crate::compose::gpu::HostGpuProbe;

/// Arguments for the cmd command.
#[derive(Debug, Args, Default)]
pub struct CmdArgs {
    /// Compose directory holding the layer files
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Print one layer per line instead of the full command
    #[arg(short = 'H', long)]
    pub human: bool,

    /// Tags to activate for this resolution (unioned with stored defaults)
    pub tags: Vec<String>,
}

/// Run `quay cmd [--dir <path>] [-H] [tags...]`.
///
/// # Errors
///
/// Returns an error if the compose directory is inaccessible or the
/// settings store cannot be read.
pub async fn run(app: &AppContext, args: &CmdArgs) -> Result<()> {
    let dir = app.compose_dir(args.dir.as_deref())?;
    let probe = HostGpuProbe::new(&app.runner);
    let plan = Resolver::new(&app.store, &probe)
        .resolve(&dir, &args.tags)
        .await?;

    if args.human {
        println!("{}", plan.render_human(&dir));
    } else {
        println!("{}", plan.delegate_command());
    }
    Ok(())
}
