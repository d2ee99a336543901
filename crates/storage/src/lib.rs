use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// The durable store the cart synchronizes with. Mirrors the browser-local
/// key/value facility the ordering page runs against: synchronous string
/// get/set/remove, scoped to one session, surviving reloads.
///
/// There is exactly one writer per store instance, so implementations only
/// need interior mutability, not cross-process coordination.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile in-process store. Backs tests and sessions that opt out of
/// durability; a reload starts empty, which the cart treats as a valid state.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store mutex poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store mutex poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// One file per key under a root directory. This is the durable variant used
/// by the kiosk binary; the directory plays the role the browser's local
/// storage plays for the web front end.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create store directory '{}'", root.display()))?;
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys are short identifiers ("cart", "table"); anything outside a
        // conservative charset is flattened so a key can never escape root.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        // "." and ".." name directories, not entries, and an empty key
        // names nothing at all; flatten those to plain dashes.
        let safe = if safe.is_empty() || safe.chars().all(|c| c == '.') {
            "-".repeat(safe.len().max(1))
        } else {
            safe
        };
        self.root.join(safe)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read store entry '{key}'"))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        debug!(key, bytes = value.len(), "writing store entry");
        fs::write(&path, value)
            .with_context(|| format!("failed to write store entry '{key}'"))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        debug!(key, "removing store entry");
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove store entry '{key}'"))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
