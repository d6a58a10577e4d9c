//! Session state injected into the fragment lifecycle.
//!
//! Controllers read and write session keys through [`SessionStore`] rather
//! than reaching for transport-level session machinery. Adapters load the
//! backing store into a [`MemorySession`] before dispatch and write changed
//! keys back afterwards, which keeps controllers testable with nothing but
//! an in-memory map.

use std::collections::BTreeMap;

use serde_json::Value;

/// Keyed JSON storage scoped to the requesting user's session.
pub trait SessionStore: Send {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value);

    /// Remove and return the value stored under `key`.
    fn remove(&mut self, key: &str) -> Option<Value>;
}

/// [`SessionStore`] backed by an in-memory map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySession {
    entries: BTreeMap<String, Value>,
}

impl MemorySession {
    /// An empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from existing entries.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Iterate over entries in lexical key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the session holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }
}
