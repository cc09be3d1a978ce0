//! Persisted preferences for marklaunch
//!
//! The crate keeps a tiny amount of state between runs: the resolved path to
//! the Marked 2 bundle and, optionally, a pinned path to the `mkstream`
//! helper. Both live in a flat JSON map under the platform config directory.
//!
//! The [`ConfigStore`] trait is the seam the locator depends on, so tests run
//! against an in-memory store instead of the filesystem.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;

use crate::error::{MarklaunchError, Result};

/// Preference key holding the resolved Marked 2 bundle path
pub const MARKED_PATH_PREF: &str = "marked.path";

/// Preference key pinning the mkstream helper location
pub const MKSTREAM_PATH_PREF: &str = "mkstream.path";

/// Read/write access to the host's key-value preference store
pub trait ConfigStore: Send + Sync {
    /// Get a preference value, or None when unset
    fn get(&self, key: &str) -> Option<String>;

    /// Set a preference value, persisting it immediately
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed preference store (`preferences.json`)
pub struct Preferences {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl Preferences {
    /// Open the default per-user preferences file
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "ursamaris", "marklaunch")
            .ok_or_else(|| MarklaunchError::config("cannot determine config directory"))?;
        Self::open(dirs.config_dir().join("preferences.json"))
    }

    /// Open a preferences file at an explicit location, creating parent
    /// directories as needed. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl ConfigStore for Preferences {
    fn get(&self, key: &str) -> Option<String> {
        let values = match self.values.lock() {
            Ok(v) => v,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = match self.values.lock() {
            Ok(v) => v,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}

/// In-memory store for tests and for hosts that bring their own persistence
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, useful when constructing test fixtures
    pub fn with(self, key: &str, value: &str) -> Self {
        {
            let mut values = self.values.lock().expect("store lock");
            values.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().expect("store lock");
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().expect("store lock");
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
