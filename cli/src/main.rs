//! Quay CLI - layered compose orchestration for containerized service fleets

use std::process::ExitCode;

use quay_cli::{cli, dispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    ExitCode::from(dispatch::dispatch(cli::route, cli::print_usage, args).await)
}
