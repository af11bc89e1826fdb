//! Typed domain error enums.
//!
//! This module has zero imports from `crate::commands`, `tokio`, `std::fs`,
//! or `std::process`. All error types implement `thiserror::Error` and
//! convert to `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Resolution errors ─────────────────────────────────────────────────────────

/// Errors raised by the layer resolution engine.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The compose directory could not be enumerated. Matching zero layers
    /// is not an error; failing to read the directory is.
    #[error("compose directory '{path}' is not accessible: {detail}")]
    Configuration { path: String, detail: String },
}

// ── Tunnel errors ─────────────────────────────────────────────────────────────

/// Errors raised by the tunnel exposure state machine.
///
/// None of these are retried automatically; they surface to the caller with
/// the triggering context (service handle, key, elapsed time).
#[derive(Debug, Error)]
pub enum TunnelError {
    /// The internal endpoint for the service could not be derived.
    #[error("no internal endpoint for '{service}': set '{key}' in the settings store")]
    EndpointUnavailable { service: String, key: String },

    /// The tunnel process did not start.
    #[error("tunnel process failed to start: {detail}")]
    SpawnFailed { detail: String },

    /// The tunnel process vanished mid-poll (e.g. a concurrent
    /// `tunnel down` removed it).
    #[error("tunnel process for '{service}' disappeared while waiting for a URL")]
    Unavailable { service: String },

    /// No public URL appeared within the bounded wait. The process has
    /// already been stopped when this is returned.
    #[error("no public URL for '{service}' after {elapsed}s")]
    Timeout { service: String, elapsed: u64 },
}
