//! Session store abstraction.
//!
//! The cache never owns data. It reads and writes entries inside a
//! namespace of a host-provided session through the [`SessionStore`] trait,
//! so hosts can plug in whatever session machinery they already have.
//! [`MemorySessionStore`] is the in-process implementation.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Per-user session storage, addressed as `namespace -> key -> value`.
///
/// Every method must fail with [`Error::SessionNotStarted`] while the
/// session is not active.
pub trait SessionStore: Send + Sync {
    /// Whether the session has been started.
    fn is_active(&self) -> bool;

    /// Whether the namespace key exists in the session.
    fn contains_namespace(&self, namespace: &str) -> Result<bool>;

    /// Read one entry from a namespace.
    fn read_entry(&self, namespace: &str, key: &str) -> Result<Option<Value>>;

    /// Write one entry, creating the namespace if needed.
    fn write_entry(&self, namespace: &str, key: &str, value: Value) -> Result<()>;

    /// Remove one entry. The namespace stays even if it becomes empty.
    fn remove_entry(&self, namespace: &str, key: &str) -> Result<()>;

    /// Remove the namespace key itself from the session.
    fn remove_namespace(&self, namespace: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct SessionState {
    active: bool,
    data: Map<String, Value>,
}

impl SessionState {
    fn data(&self) -> Result<&Map<String, Value>> {
        if self.active {
            Ok(&self.data)
        } else {
            Err(Error::SessionNotStarted)
        }
    }

    fn data_mut(&mut self) -> Result<&mut Map<String, Value>> {
        if self.active {
            Ok(&mut self.data)
        } else {
            Err(Error::SessionNotStarted)
        }
    }
}

fn as_namespace<'a>(namespace: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| Error::NamespaceNotAMap {
        namespace: namespace.to_string(),
    })
}

fn as_namespace_mut<'a>(
    namespace: &str,
    value: &'a mut Value,
) -> Result<&'a mut Map<String, Value>> {
    value.as_object_mut().ok_or_else(|| Error::NamespaceNotAMap {
        namespace: namespace.to_string(),
    })
}

/// In-memory session store.
///
/// A cheap handle: clones share the same session. The session starts
/// inactive; call [`start`](Self::start) (or use [`started`](Self::started))
/// before handing it to a cache.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl MemorySessionStore {
    /// Create a store whose session has not been started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an already started, empty session.
    pub fn started() -> Self {
        let store = Self::new();
        store.start();
        store
    }

    /// Start the session. Existing data is kept.
    pub fn start(&self) {
        self.inner.write().active = true;
    }

    /// Destroy the session: drop all data and deactivate.
    pub fn destroy(&self) {
        let mut state = self.inner.write();
        state.data.clear();
        state.active = false;
    }

    /// Start a session from previously persisted data.
    pub fn restore(&self, data: Map<String, Value>) {
        let mut state = self.inner.write();
        state.data = data;
        state.active = true;
    }

    /// Copy of the whole session, e.g. for the host's own persistence.
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        Ok(self.inner.read().data()?.clone())
    }

    /// Read a top-level session value.
    pub fn value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.read().data()?.get(key).cloned())
    }

    /// Set a top-level session value, returning the previous one.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        Ok(self.inner.write().data_mut()?.insert(key.into(), value))
    }

    /// Remove a top-level session value.
    pub fn remove(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.write().data_mut()?.remove(key))
    }

    /// Top-level session keys.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.inner.read().data()?.keys().cloned().collect())
    }
}

impl SessionStore for MemorySessionStore {
    fn is_active(&self) -> bool {
        self.inner.read().active
    }

    fn contains_namespace(&self, namespace: &str) -> Result<bool> {
        Ok(self.inner.read().data()?.contains_key(namespace))
    }

    fn read_entry(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        let state = self.inner.read();
        match state.data()?.get(namespace) {
            Some(ns) => Ok(as_namespace(namespace, ns)?.get(key).cloned()),
            None => Ok(None),
        }
    }

    fn write_entry(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        let mut state = self.inner.write();
        let ns = state
            .data_mut()?
            .entry(namespace.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        as_namespace_mut(namespace, ns)?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_entry(&self, namespace: &str, key: &str) -> Result<()> {
        let mut state = self.inner.write();
        if let Some(ns) = state.data_mut()?.get_mut(namespace) {
            as_namespace_mut(namespace, ns)?.remove(key);
        }
        Ok(())
    }

    fn remove_namespace(&self, namespace: &str) -> Result<()> {
        self.inner.write().data_mut()?.remove(namespace);
        Ok(())
    }
}
