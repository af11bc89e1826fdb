//! CLI argument parsing with clap derive, plus the router adapting parse
//! results to dispatch outcomes.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;
use crate::dispatch::Outcome;

/// Layered compose orchestration for containerized service fleets
#[derive(Debug, Parser)]
#[command(
    name = "quay",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the assembled compose command for the active tags
    Cmd(commands::cmd::CmdArgs),

    /// Start services (delegates to the engine with resolved layers)
    Up(commands::delegate::DelegateArgs),

    /// Stop services
    Down(commands::delegate::DelegateArgs),

    /// List service containers
    Ps(commands::delegate::DelegateArgs),

    /// Show service logs
    Logs(commands::delegate::DelegateArgs),

    /// Pull service images
    Pull(commands::delegate::DelegateArgs),

    /// Expose a service through a public tunnel URL
    Tunnel(commands::tunnel::TunnelArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

/// Print top-level usage; called when dispatch gives up on both orderings.
pub fn print_usage() {
    let _ = Cli::command().print_help();
}

/// Route one argument vector to a handler.
///
/// An unknown leading subcommand becomes [`Outcome::Unrecognized`] so the
/// dispatch controller can retry with swapped positionals. All other parse
/// errors are terminal: clap prints its own message and the outcome carries
/// the conventional usage-error code.
pub async fn route(args: Vec<String>) -> Outcome {
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            return match e.kind() {
                ErrorKind::InvalidSubcommand => Outcome::Unrecognized,
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    Outcome::Handled
                }
                _ => {
                    let _ = e.print();
                    Outcome::Failed(2)
                }
            };
        }
    };
    cli.run().await
}

impl Cli {
    /// Execute the parsed command, mapping handler results to outcomes.
    pub async fn run(self) -> Outcome {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let app = match AppContext::new(no_color, quiet) {
            Ok(app) => app,
            Err(e) => {
                eprintln!("Error: {e:#}");
                return Outcome::Failed(1);
            }
        };

        let result = match command {
            Command::Cmd(args) => commands::cmd::run(&app, &args).await.map(|()| 0),
            Command::Up(args) => commands::delegate::run(&app, "up", &args).await,
            Command::Down(args) => commands::delegate::run(&app, "down", &args).await,
            Command::Ps(args) => commands::delegate::run(&app, "ps", &args).await,
            Command::Logs(args) => commands::delegate::run(&app, "logs", &args).await,
            Command::Pull(args) => commands::delegate::run(&app, "pull", &args).await,
            Command::Tunnel(args) => commands::tunnel::run(&app, &args).await.map(|()| 0),
            Command::Config(cmd) => commands::config::run(&app, &cmd).map(|()| 0),
            Command::Version => commands::version::run().map(|()| 0),
        };

        match result {
            Ok(0) => Outcome::Handled,
            Ok(code) => Outcome::Failed(code),
            Err(e) => {
                app.output.error(&format!("{e:#}"));
                Outcome::Failed(1)
            }
        }
    }
}
