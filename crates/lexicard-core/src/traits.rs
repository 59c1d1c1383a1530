//! Persistence contract.
//!
//! The library, quiz history, and user settings are each stored as one JSON
//! document under a fixed key. Any durable key-value medium will do; the
//! filesystem implementation lives in `lexicard-storage`.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Key-value store trait
// ---------------------------------------------------------------------------

/// Durable string-keyed storage with whole-value overwrites.
pub trait KeyValueStore {
    /// Human-readable backend name (e.g. "json-file").
    fn name(&self) -> &str;

    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete `key`. Returns whether anything was removed.
    fn remove(&mut self, key: &str) -> anyhow::Result<bool>;

    /// Delete every key.
    fn clear(&mut self) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store used by tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("memory store is read-only, cannot write '{key}'");
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        Ok(())
    }
}
