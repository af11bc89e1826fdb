//! Application context — unified state passed to every command handler.
//!
//! Constructed once in `Cli::run()` and passed as `&AppContext` to all
//! handlers. The settings store and command runner live here so handlers
//! receive explicit collaborators instead of reaching for ambient state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::command_runner::TokioCommandRunner;
use crate::output::OutputContext;
use crate::store::{FileStore, SettingsStore};

/// Store key for the default compose directory.
pub const COMPOSE_DIR_KEY: &str = "compose.dir";

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Persisted settings store.
    pub store: FileStore,
    /// Subprocess runner for engine and probe invocations.
    pub runner: TokioCommandRunner,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store location cannot be determined
    /// (home directory not found).
    pub fn new(no_color: bool, quiet: bool) -> Result<Self> {
        Ok(Self {
            output: OutputContext::new(no_color, quiet),
            store: FileStore::new()?,
            runner: TokioCommandRunner::default(),
        })
    }

    /// Compose directory for this invocation: the explicit flag wins, then
    /// the stored `compose.dir`, then the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or no current directory
    /// is available.
    pub fn compose_dir(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = flag {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = self.store.get(COMPOSE_DIR_KEY)? {
            return Ok(PathBuf::from(dir));
        }
        std::env::current_dir().context("determining current directory")
    }
}
