//! `quay version` — print the version line.

use anyhow::Result;

/// Run `quay version`.
///
/// # Errors
///
/// Infallible; returns `Result` for signature uniformity with the other
/// handlers.
pub fn run() -> Result<()> {
    println!("quay {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
