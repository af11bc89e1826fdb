//! Persisted settings store — scalar and ordered-list values.
//!
//! The store backs layer resolution (default tag list) and the tunnel
//! machinery (per-service endpoints). Handles are passed explicitly into
//! the code that needs them; nothing in this crate reads settings through
//! ambient process state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Delimiter for list-valued settings (`list` splits on this).
pub const LIST_DELIMITER: char = ';';

/// Key/value settings access. Keys are namespaced implicitly by the store
/// location — one store file per installation.
pub trait SettingsStore {
    /// Read a scalar value. `Ok(None)` when the key is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file exists but cannot be read or parsed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a scalar value, creating the store if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read an ordered list stored as a delimiter-joined scalar.
    /// An unset key yields an empty list; order is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file exists but cannot be read or parsed.
    fn list(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .get(key)?
            .map(|value| {
                value
                    .split(LIST_DELIMITER)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Production store — a flat JSON map on disk.
///
/// Loaded fresh on every access so concurrent invocations observe each
/// other's writes; last writer wins on `set`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the default path (`~/.quay/settings.json`),
    /// honouring the `QUAY_SETTINGS` override.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Ok(val) = std::env::var("QUAY_SETTINGS") {
            return Ok(Self::with_path(PathBuf::from(val)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".quay").join("settings.json")))
    }

    /// Create a store with an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading settings file {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing settings file {}", self.path.display()))
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(map).context("serializing settings")?;
        std::fs::write(&self.path, &content)
            .with_context(|| format!("writing settings file {}", self.path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }
}
