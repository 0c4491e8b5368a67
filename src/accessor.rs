//! Per-instance preference access
//!
//! A [`PreferenceAccessor`] pairs one host instance's store with the
//! declarations of its host type. Every name is checked against the registry,
//! every write is typecast, and every store failure is returned as-is.
//!
//! Writes take `&mut self`. Sharing one accessor between threads means
//! wrapping it in a lock; the accessor itself imposes no ordering.

use crate::coerce::coerce;
use crate::config::{ClearScope, PreferenceSpec, PreferenceType, PreferencesConfig};
use crate::error::{Error, Result};
use crate::merge;
use crate::registry::HostKey;
use crate::store::{MemoryStore, PreferenceStore};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Preference operations for one host instance
///
/// # Example
///
/// ```rust
/// use preferable::{MemoryStore, PreferenceSpec, PreferencesConfig};
/// use serde_json::json;
///
/// struct Settings;
///
/// let config = PreferencesConfig::builder()
///     .declare::<Settings>(PreferenceSpec::string("color", "red"))
///     .declare::<Settings>(PreferenceSpec::integer("temperature", 21))
///     .build();
///
/// let mut prefs = config.attach::<Settings, _>(MemoryStore::new())?;
/// assert_eq!(prefs.get("color")?, json!("red"));
///
/// // Typecasting is performed on assignment
/// prefs.set("temperature", "24")?;
/// assert_eq!(prefs.get_as::<i64>("temperature")?, 24);
///
/// assert!(prefs.get("size").unwrap_err().is_undeclared());
/// # Ok::<(), preferable::Error>(())
/// ```
#[derive(Debug)]
pub struct PreferenceAccessor<S: PreferenceStore = MemoryStore> {
    host: HostKey,
    config: PreferencesConfig,
    store: S,
}

impl<S: PreferenceStore> PreferenceAccessor<S> {
    /// Attach `store` to the host type `H`
    ///
    /// Runs the defaults merge once, unless the config disables it.
    ///
    /// # Errors
    ///
    /// Returns an error if a default cannot be typecast or the store fails.
    pub fn new<H: ?Sized + 'static>(config: &PreferencesConfig, store: S) -> Result<Self> {
        Self::for_host(HostKey::of::<H>(), config, store)
    }

    /// Attach `store` to an explicit host key
    ///
    /// # Errors
    ///
    /// Returns an error if a default cannot be typecast or the store fails.
    pub fn for_host(host: HostKey, config: &PreferencesConfig, store: S) -> Result<Self> {
        let mut accessor = Self {
            host,
            config: config.clone(),
            store,
        };

        if accessor.config.merge_defaults_on_init {
            accessor.merge_defaults()?;
        }

        info!("Attached preference store to {host}");
        Ok(accessor)
    }

    /// Host type this accessor serves
    pub fn host(&self) -> HostKey {
        self.host
    }

    /// Configuration this accessor was attached with
    pub fn config(&self) -> &PreferencesConfig {
        &self.config
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Detach and return the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    fn spec(&self, name: &str) -> Result<PreferenceSpec> {
        self.config
            .registry
            .spec_for(self.host, name)
            .ok_or_else(|| Error::UndeclaredPreference(name.to_string()))
    }

    // =========================================================================
    // Single preference
    // =========================================================================

    /// Current value of a preference
    ///
    /// A declared preference missing from the store (declared after the store
    /// was attached, or attached without a merge) reads as its typecast
    /// default. The default is not written back.
    ///
    /// # Errors
    ///
    /// - [`Error::UndeclaredPreference`] if `name` is not declared
    /// - store failures, unchanged
    pub fn get(&self, name: &str) -> Result<Value> {
        let spec = self.spec(name)?;
        match self.store.fetch(name)? {
            Some(value) => Ok(value),
            None => {
                debug!("Preference '{name}' not in store, reading default");
                spec.coerced_default()
            }
        }
    }

    /// Current value of a preference, deserialized into `T`
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), plus [`Error::Parse`] if the value does not
    /// deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?;
        serde_json::from_value(value).map_err(|e| Error::Parse(format!("{name}: {e}")))
    }

    /// Typecast `value` to the declared type and store it
    ///
    /// # Errors
    ///
    /// - [`Error::UndeclaredPreference`] if `name` is not declared
    /// - [`Error::Coercion`] if the value cannot be typecast
    /// - store failures, unchanged
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let spec = self.spec(name)?;
        let coerced = coerce(value.into(), spec.pref_type)?;
        debug!("Setting preference '{name}' ({}) on {}", spec.pref_type, self.host);
        self.store.set(name, coerced)
    }

    /// Write the typecast default back for one preference
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let spec = self.spec(name)?;
        let default = spec.coerced_default()?;
        debug!("Resetting preference '{name}' on {}", self.host);
        self.store.set(name, default)
    }

    /// Declared type of a preference
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndeclaredPreference`] if `name` is not declared.
    pub fn type_of(&self, name: &str) -> Result<PreferenceType> {
        Ok(self.spec(name)?.pref_type)
    }

    /// Typecast default of a preference
    ///
    /// # Errors
    ///
    /// - [`Error::UndeclaredPreference`] if `name` is not declared
    /// - [`Error::Coercion`] if the declared default cannot be typecast
    pub fn default_of(&self, name: &str) -> Result<Value> {
        self.spec(name)?.coerced_default()
    }

    /// Whether `name` is declared for this host type
    pub fn has(&self, name: &str) -> bool {
        self.config.registry.contains(self.host, name)
    }

    // =========================================================================
    // All preferences
    // =========================================================================

    /// Declared names, in declaration order
    pub fn declared_names(&self) -> Vec<String> {
        self.config.registry.names_for(self.host)
    }

    /// Typecast default of every declared preference
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`] if any declared default cannot be typecast.
    pub fn defaults_snapshot(&self) -> Result<Map<String, Value>> {
        self.config
            .registry
            .specs_for(self.host)
            .into_iter()
            .map(|spec| {
                let value = spec.coerced_default()?;
                Ok((spec.name, value))
            })
            .collect()
    }

    /// Current value of every declared preference
    ///
    /// Undeclared keys in the store are not included.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        self.declared_names()
            .into_iter()
            .map(|name| {
                let value = self.get(&name)?;
                Ok((name, value))
            })
            .collect()
    }

    /// Deserialize every declared preference into a typed struct
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot), plus [`Error::Parse`] if the
    /// values do not deserialize into `T`.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T> {
        let snapshot = Value::Object(self.snapshot()?);
        serde_json::from_value(snapshot).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Seed the store with every default it does not hold yet
    ///
    /// Stored values are never overwritten. Returns the number of keys written.
    ///
    /// # Errors
    ///
    /// Returns an error if a default cannot be typecast or the store fails.
    pub fn merge_defaults(&mut self) -> Result<usize> {
        let defaults = self.defaults_snapshot()?;
        merge::merge_defaults(&mut self.store, defaults)
    }

    /// Remove preferences from the store
    ///
    /// With [`ClearScope::StoredKeys`] (the default) every key currently in
    /// the store goes, including keys no longer declared. With
    /// [`ClearScope::DeclaredOnly`] undeclared keys are kept. Returns the
    /// number of keys removed.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub fn clear_all(&mut self) -> Result<usize> {
        let keys = match self.config.clear_scope {
            ClearScope::StoredKeys => self.store.keys()?,
            ClearScope::DeclaredOnly => {
                let mut present = Vec::new();
                for name in self.declared_names() {
                    if self.store.contains(&name)? {
                        present.push(name);
                    }
                }
                present
            }
        };

        for key in &keys {
            self.store.delete(key)?;
        }

        debug!("Cleared {} preference(s) on {}", keys.len(), self.host);
        Ok(keys.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
