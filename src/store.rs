//! Preference store trait and in-memory implementations
//!
//! The store is owned by the host instance. This crate never persists it;
//! hosts that need durability implement [`PreferenceStore`] over their own
//! backend (a serialized column, a file, a remote service) and report
//! backend failures as [`Error::StoreUnavailable`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Minimal key-value contract consumed by the preference accessor
///
/// Values handed to [`set`](PreferenceStore::set) are already typecast.
pub trait PreferenceStore {
    /// Fetch a stored value
    ///
    /// Returns `Ok(None)` when the key is absent. A stored `null` is
    /// `Ok(Some(Value::Null))`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn fetch(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Keys currently present
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;

    /// Check if a key is present
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.fetch(key)?.is_some())
    }

    /// Fetch a value that must be present
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    fn fetch_required(&self, key: &str) -> Result<Value> {
        self.fetch(key)?
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &mut S {
    fn fetch(&self, key: &str) -> Result<Option<Value>> {
        (**self).fetch(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn fetch(&self, key: &str) -> Result<Option<Value>> {
        (**self).fetch(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

// =============================================================================
// Map-backed stores
// =============================================================================

macro_rules! impl_map_store {
    ($map:ty) => {
        impl PreferenceStore for $map {
            fn fetch(&self, key: &str) -> Result<Option<Value>> {
                Ok(self.get(key).cloned())
            }

            fn set(&mut self, key: &str, value: Value) -> Result<()> {
                self.insert(key.to_string(), value);
                Ok(())
            }

            fn delete(&mut self, key: &str) -> Result<()> {
                self.remove(key);
                Ok(())
            }

            fn keys(&self) -> Result<Vec<String>> {
                Ok(self.keys().cloned().collect())
            }

            fn contains(&self, key: &str) -> Result<bool> {
                Ok(self.contains_key(key))
            }
        }
    };
}

impl_map_store!(Map<String, Value>);
impl_map_store!(HashMap<String, Value>);
impl_map_store!(BTreeMap<String, Value>);

/// In-memory preference store
///
/// Serializes as a plain JSON object, so a host can keep it in a single
/// serialized column or file and load it back with [`MemoryStore::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: Map<String, Value>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing entries, e.g. values loaded from durable state
    #[must_use]
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Parse a store from a JSON object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] for invalid JSON or a non-object document.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(Error::from)
    }

    /// Serialize the store as a compact JSON object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries).map_err(Error::from)
    }

    /// Borrow the entries
    #[must_use]
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Unwrap into the entries
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for MemoryStore {
    fn from(entries: Map<String, Value>) -> Self {
        Self::from_map(entries)
    }
}

impl PreferenceStore for MemoryStore {
    fn fetch(&self, key: &str) -> Result<Option<Value>> {
        self.entries.fetch(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        PreferenceStore::set(&mut self.entries, key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        PreferenceStore::delete(&mut self.entries, key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        PreferenceStore::keys(&self.entries)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_set_and_fetch() {
        let mut store = MemoryStore::new();

        store.set("color", json!("red")).unwrap();
        store.set("size", json!(null)).unwrap();

        assert_eq!(store.fetch("color").unwrap(), Some(json!("red")));
        assert_eq!(store.fetch("size").unwrap(), Some(json!(null)));
        assert_eq!(store.fetch("missing").unwrap(), None);
        assert!(store.contains("size").unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_memory_delete() {
        let mut store = MemoryStore::new();

        store.set("color", json!("red")).unwrap();
        store.delete("color").unwrap();
        store.delete("never-set").unwrap();

        assert!(!store.contains("color").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_fetch_required() {
        let mut store = MemoryStore::new();
        store.set("color", json!("red")).unwrap();

        assert_eq!(store.fetch_required("color").unwrap(), json!("red"));
        let err = store.fetch_required("size").unwrap_err();
        assert!(matches!(err, Error::KeyNotFound(ref key) if key == "size"));
    }

    #[test]
    fn test_json_roundtrip() {
        let store = MemoryStore::from_json(r#"{"color":"green","temperature":24}"#).unwrap();
        assert_eq!(store.fetch("temperature").unwrap(), Some(json!(24)));

        let json = store.to_json().unwrap();
        assert_eq!(MemoryStore::from_json(&json).unwrap(), store);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let result = MemoryStore::from_json("[1, 2]");
        assert!(matches!(result.unwrap_err(), Error::Serialize(_)));
    }

    #[test]
    fn test_hashmap_store() {
        let mut store: HashMap<String, Value> = HashMap::new();
        PreferenceStore::set(&mut store, "a", json!(1)).unwrap();
        PreferenceStore::set(&mut store, "b", json!(2)).unwrap();

        let mut keys = PreferenceStore::keys(&store).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    fn write_color<S: PreferenceStore>(mut store: S) {
        store.set("color", json!("blue")).unwrap();
    }

    #[test]
    fn test_borrowed_store() {
        let mut inner = MemoryStore::new();
        write_color(&mut inner);
        assert_eq!(inner.fetch("color").unwrap(), Some(json!("blue")));

        let mut boxed: Box<dyn PreferenceStore> = Box::new(MemoryStore::new());
        write_color(&mut boxed);
        assert!(boxed.contains("color").unwrap());
    }
}
