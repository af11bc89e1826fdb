//! Layer resolution engine.
//!
//! Decides which compose layer files apply for one invocation and in what
//! order, then assembles the delegate command for the container engine.
//! Resolution is recomputed from scratch every time: layers are rediscovered
//! from disk, the active tag set is rebuilt from caller tags plus the stored
//! defaults, and the GPU probe re-runs. Nothing is cached across calls.

pub mod gpu;
pub mod layer;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::ResolveError;
use crate::store::SettingsStore;
use gpu::{GPU_TAG, GpuProbe};
use layer::{BASE_FILE, Layer};

/// Container engine invocation the delegate command is built for.
pub const ENGINE: &str = "docker";

/// Engine subcommand that understands repeated `-f <file>` flags.
pub const ENGINE_ACTION: &str = "compose";

/// Store key holding the default tag list (semicolon-joined).
pub const DEFAULT_TAGS_KEY: &str = "compose.defaults";

/// Ordered outcome of one resolution pass: base layer first, then matched
/// layers ascending by specificity. Produced per invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
    /// Layer files in merge order. Later files override keys from earlier
    /// ones under the engine's merge semantics, so order is load-bearing.
    pub files: Vec<PathBuf>,
}

impl ResolvedPlan {
    /// Full delegate command as a single string, machine form.
    #[must_use]
    pub fn delegate_command(&self) -> String {
        let mut parts = vec![ENGINE.to_string(), ENGINE_ACTION.to_string()];
        for file in &self.files {
            parts.push("-f".to_string());
            parts.push(file.display().to_string());
        }
        parts.join(" ")
    }

    /// Argument vector for the engine: `compose -f <file>... <action...>`.
    #[must_use]
    pub fn delegate_args(&self, action: &[String]) -> Vec<String> {
        let mut args = vec![ENGINE_ACTION.to_string()];
        for file in &self.files {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }
        args.extend(action.iter().cloned());
        args
    }

    /// Human-readable rendering: one layer per line, relative to `root`
    /// where possible. Diagnostic only; resolution is unaffected.
    #[must_use]
    pub fn render_human(&self, root: &Path) -> String {
        self.files
            .iter()
            .map(|file| {
                file.strip_prefix(root)
                    .unwrap_or(file)
                    .display()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Enumerate layer files directly inside `base_dir` (non-recursive),
/// ordered by specificity ascending with lexicographic file name as the
/// tie-break. The base file is excluded; callers place it first themselves.
///
/// # Errors
///
/// Returns [`ResolveError::Configuration`] when `base_dir` cannot be read.
pub fn discover(base_dir: &Path) -> Result<Vec<Layer>, ResolveError> {
    let entries = std::fs::read_dir(base_dir).map_err(|e| ResolveError::Configuration {
        path: base_dir.display().to_string(),
        detail: e.to_string(),
    })?;

    let mut layers: Vec<Layer> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| layer::parse(&entry.path()))
        .collect();
    layers.sort_by(|a, b| {
        a.specificity()
            .cmp(&b.specificity())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });
    Ok(layers)
}

/// Filter `layers` down to those matching `active`, preserving order.
/// `layers` is expected to be specificity-sorted (see [`discover`]).
#[must_use]
pub fn select<'l>(layers: &'l [Layer], active: &HashSet<String>) -> Vec<&'l Layer> {
    layers.iter().filter(|l| l.matches(active)).collect()
}

/// Layer resolution engine. Holds explicit handles to its collaborators —
/// the settings store supplying default tags and the GPU capability probe.
pub struct Resolver<'a, S: SettingsStore, P: GpuProbe> {
    store: &'a S,
    probe: &'a P,
}

impl<'a, S: SettingsStore, P: GpuProbe> Resolver<'a, S, P> {
    #[must_use]
    pub fn new(store: &'a S, probe: &'a P) -> Self {
        Self { store, probe }
    }

    /// Resolve the plan for one invocation.
    ///
    /// The active set is the union of `explicit` caller tags, the stored
    /// default tag list, and the synthetic GPU tag when the probe succeeds.
    /// Matching zero non-base layers is fine — the plan is then the base
    /// layer alone.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_dir` is inaccessible or the store cannot
    /// be read.
    pub async fn resolve(&self, base_dir: &Path, explicit: &[String]) -> Result<ResolvedPlan> {
        let layers = discover(base_dir)?;

        let mut active: HashSet<String> = explicit.iter().cloned().collect();
        active.extend(self.store.list(DEFAULT_TAGS_KEY)?);
        if self.probe.available().await {
            active.insert(GPU_TAG.to_string());
        }

        let mut files = vec![base_dir.join(BASE_FILE)];
        files.extend(select(&layers, &active).into_iter().map(|l| l.path.clone()));
        Ok(ResolvedPlan { files })
    }
}
