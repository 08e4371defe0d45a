//! Persistent configuration cache.
//!
//! Models the surrounding build system's configuration cache as an
//! explicit key-value store handed to the locator rather than
//! process-global state. Values written by one resolution pass
//! short-circuit later passes in the same session; `load`/`save` carry
//! the cache across sessions as TOML.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// String-keyed configuration store with TOML persistence.
///
/// Backed by a `BTreeMap` so serialized output is deterministic. Flag
/// values use the build-system convention of `TRUE`/`FALSE` strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigCache {
    values: BTreeMap<String, String>,

    #[serde(skip)]
    dirty: bool,
}

impl ConfigCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config cache: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config cache: {}", path.display()))
    }

    /// Load a cache, falling back to empty if the file doesn't exist or
    /// can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config cache from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save the cache to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create cache directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(self).context("failed to serialize config cache")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config cache: {}", path.display()))?;

        Ok(())
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
        self.dirty = true;
    }

    /// Store a boolean flag as `TRUE`/`FALSE`.
    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "TRUE" } else { "FALSE" });
    }

    /// Read a boolean flag. Unset keys and unknown values read as false.
    pub fn get_flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("TRUE") | Some("ON") | Some("1") | Some("true"))
    }

    /// Whether a key is present, regardless of its value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a key, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let prev = self.values.remove(key);
        if prev.is_some() {
            self.dirty = true;
        }
        prev
    }

    /// Whether the cache holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether any value was written since construction or load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
