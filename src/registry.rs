//! Registry of declared preferences, per host type
//!
//! Declarations are expected to happen once, while hosts are being set up.
//! After that the registry is only read, typically through an `Arc` shared by
//! every accessor. The internal lock exists so a late declaration is still
//! sound; it is never held across a store call.

use crate::config::{PreferenceSchema, PreferenceSpec};
use log::debug;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Identity of a host type owning a set of preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostKey {
    id: TypeId,
    name: &'static str,
}

impl HostKey {
    /// Key for the host type `H`
    #[must_use]
    pub fn of<H: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
        }
    }

    /// Fully qualified type name of the host
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared preference specs, grouped by host type and kept in declaration order
#[derive(Debug, Default)]
pub struct PreferenceRegistry {
    hosts: RwLock<HashMap<HostKey, Vec<PreferenceSpec>>>,
}

impl PreferenceRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a preference for `host`
    ///
    /// Re-declaring a name replaces its spec (last declaration wins) but keeps
    /// the position of the first declaration.
    pub fn declare(&self, host: HostKey, spec: PreferenceSpec) {
        let mut hosts = self.write();
        let specs = hosts.entry(host).or_default();

        match specs.iter_mut().find(|existing| existing.name == spec.name) {
            Some(existing) => {
                debug!("Redeclared preference '{}' on {host}", spec.name);
                *existing = spec;
            }
            None => {
                debug!(
                    "Declared preference '{}' ({}) on {host}",
                    spec.name, spec.pref_type
                );
                specs.push(spec);
            }
        }
    }

    /// Declare a preference for the host type `H`
    pub fn declare_for<H: ?Sized + 'static>(&self, spec: PreferenceSpec) {
        self.declare(HostKey::of::<H>(), spec);
    }

    /// Declare every preference of a schema, with the schema type as host
    pub fn register<T: PreferenceSchema + 'static>(&self) {
        self.register_for(HostKey::of::<T>(), T::declarations());
    }

    /// Declare a batch of preferences for `host`
    pub fn register_for(&self, host: HostKey, specs: impl IntoIterator<Item = PreferenceSpec>) {
        for spec in specs {
            self.declare(host, spec);
        }
    }

    /// All specs declared for `host`, in declaration order
    #[must_use]
    pub fn specs_for(&self, host: HostKey) -> Vec<PreferenceSpec> {
        self.read().get(&host).cloned().unwrap_or_default()
    }

    /// Spec for `name` on `host`, if declared
    #[must_use]
    pub fn spec_for(&self, host: HostKey, name: &str) -> Option<PreferenceSpec> {
        self.read()
            .get(&host)
            .and_then(|specs| specs.iter().find(|s| s.name == name).cloned())
    }

    /// Whether `name` is declared on `host`
    #[must_use]
    pub fn contains(&self, host: HostKey, name: &str) -> bool {
        self.read()
            .get(&host)
            .is_some_and(|specs| specs.iter().any(|s| s.name == name))
    }

    /// Declared names for `host`, in declaration order
    #[must_use]
    pub fn names_for(&self, host: HostKey) -> Vec<String> {
        self.read()
            .get(&host)
            .map(|specs| specs.iter().map(|s| s.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Host types with at least one declaration
    #[must_use]
    pub fn hosts(&self) -> Vec<HostKey> {
        self.read().keys().copied().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<HostKey, Vec<PreferenceSpec>>> {
        self.hosts.read().unwrap_or_else(|poisoned| {
            log::warn!("Preference registry lock was poisoned (read), recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<HostKey, Vec<PreferenceSpec>>> {
        self.hosts.write().unwrap_or_else(|poisoned| {
            log::warn!("Preference registry lock was poisoned (write), recovering");
            poisoned.into_inner()
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
