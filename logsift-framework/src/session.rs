//! Persisting the filter string between sessions.
//!
//! Storage itself belongs to the host; the core only talks to a small
//! key-value trait.

use std::collections::HashMap;

/// key under which the active filter string is stored
pub const FILTER_KEY: &str = "logsift.filter";

/// key-value storage provided by the host application
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn clear(&mut self, key: &str);
}

/// process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// saves and restores the filter string verbatim
pub struct FilterSession<S: SessionStore> {
    store: S,
    key: String,
}

impl<S: SessionStore> FilterSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, FILTER_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// store `filter` as typed; an empty filter clears the saved one
    pub fn save(&mut self, filter: &str) {
        if filter.is_empty() {
            self.store.clear(&self.key);
        } else {
            self.store.set(&self.key, filter);
        }
    }

    pub fn restore(&self) -> Option<String> {
        self.store.get(&self.key)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_verbatim() {
        let mut session = FilterSession::new(MemoryStore::new());
        assert_eq!(session.restore(), None);

        session.save("  error ||!timeout|| #5::");
        assert_eq!(session.restore().as_deref(), Some("  error ||!timeout|| #5::"));
    }

    #[test]
    fn test_empty_filter_clears() {
        let mut session = FilterSession::new(MemoryStore::new());
        session.save("error");
        session.save("");
        assert_eq!(session.restore(), None);

        let store = session.into_store();
        assert_eq!(store.get(FILTER_KEY), None);
    }

    #[test]
    fn test_custom_key() {
        let mut session = FilterSession::with_key(MemoryStore::new(), "tab-2");
        session.save("warn");
        assert_eq!(session.into_store().get("tab-2").as_deref(), Some("warn"));
    }
}
