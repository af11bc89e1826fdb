//! Command handlers — one module per subcommand.

pub mod cmd;
pub mod config;
pub mod delegate;
pub mod tunnel;
pub mod version;
