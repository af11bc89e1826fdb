//! `quay config` — read and write the settings store.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::store::SettingsStore;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print a scalar value (empty output when unset)
    Get {
        /// Setting key
        key: String,
    },
    /// Set a scalar value
    Set {
        /// Setting key
        key: String,
        /// Setting value (use `;` to separate list items)
        value: String,
    },
    /// Print a list value, one item per line
    List {
        /// Setting key
        key: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the settings store cannot be read or written.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Get { key } => {
            if let Some(value) = app.store.get(key)? {
                println!("{value}");
            }
        }
        ConfigCommand::Set { key, value } => {
            app.store.set(key, value)?;
            app.output.success(&format!("Set {key} = {value}"));
        }
        ConfigCommand::List { key } => {
            for item in app.store.list(key)? {
                println!("{item}");
            }
        }
    }
    Ok(())
}
