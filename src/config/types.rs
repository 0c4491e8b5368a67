//! Configuration shared by every accessor

use std::sync::Arc;

use crate::accessor::PreferenceAccessor;
use crate::config::{PreferenceSchema, PreferenceSpec};
use crate::error::Result;
use crate::registry::{HostKey, PreferenceRegistry};
use crate::store::PreferenceStore;

/// Which keys [`PreferenceAccessor::clear_all`] removes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearScope {
    /// Every key currently in the store, declared or not (default)
    #[default]
    StoredKeys,
    /// Only keys declared for the host type; undeclared keys are left alone
    DeclaredOnly,
}

/// Configuration wiring declared preferences to host stores
///
/// Holds the shared registry plus the policies every accessor follows. It is
/// cheap to clone; accessors keep their own copy.
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    /// Declared preferences for every host type
    pub registry: Arc<PreferenceRegistry>,

    /// Keys removed by `clear_all`
    pub clear_scope: ClearScope,

    /// Seed each store with defaults when it is attached (default: true)
    pub merge_defaults_on_init: bool,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            registry: Arc::new(PreferenceRegistry::new()),
            clear_scope: ClearScope::default(),
            merge_defaults_on_init: true,
        }
    }
}

impl PreferencesConfig {
    /// Create a new builder for `PreferencesConfig`
    ///
    /// # Example
    /// ```rust
    /// use preferable::{PreferencesConfig, PreferenceSpec};
    ///
    /// struct Settings;
    ///
    /// let config = PreferencesConfig::builder()
    ///     .declare::<Settings>(PreferenceSpec::string("color", "red"))
    ///     .declare::<Settings>(PreferenceSpec::integer("temperature", 21))
    ///     .build();
    ///
    /// assert_eq!(config.registry.names_for(preferable::HostKey::of::<Settings>()).len(), 2);
    /// ```
    #[must_use]
    pub fn builder() -> PreferencesConfigBuilder {
        PreferencesConfigBuilder::new()
    }

    /// Create a config around an existing registry, with default policies
    #[must_use]
    pub fn new(registry: Arc<PreferenceRegistry>) -> Self {
        Self {
            registry,
            ..Default::default()
        }
    }

    /// Attach a store to the host type `H`
    ///
    /// Seeds the store with declared defaults (unless disabled) and returns the
    /// accessor the host should keep.
    ///
    /// # Errors
    ///
    /// Returns an error if a default cannot be typecast or the store fails.
    pub fn attach<H: ?Sized + 'static, S: PreferenceStore>(
        &self,
        store: S,
    ) -> Result<PreferenceAccessor<S>> {
        PreferenceAccessor::new::<H>(self, store)
    }

    /// Attach a store to an explicit host key
    ///
    /// # Errors
    ///
    /// Returns an error if a default cannot be typecast or the store fails.
    pub fn attach_host<S: PreferenceStore>(
        &self,
        host: HostKey,
        store: S,
    ) -> Result<PreferenceAccessor<S>> {
        PreferenceAccessor::for_host(host, self, store)
    }
}

/// Builder for creating a `PreferencesConfig` with a fluent API
#[derive(Debug, Default)]
pub struct PreferencesConfigBuilder {
    registry: Option<Arc<PreferenceRegistry>>,
    declarations: Vec<(HostKey, PreferenceSpec)>,
    clear_scope: ClearScope,
    skip_default_merge: bool,
}

impl PreferencesConfigBuilder {
    /// Create a new builder with an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add declarations to an existing registry instead of a fresh one
    #[must_use]
    pub fn registry(mut self, registry: Arc<PreferenceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Declare a preference for the host type `H`
    #[must_use]
    pub fn declare<H: ?Sized + 'static>(mut self, spec: PreferenceSpec) -> Self {
        self.declarations.push((HostKey::of::<H>(), spec));
        self
    }

    /// Declare several preferences for the host type `H`
    #[must_use]
    pub fn declare_all<H: ?Sized + 'static>(
        mut self,
        specs: impl IntoIterator<Item = PreferenceSpec>,
    ) -> Self {
        let host = HostKey::of::<H>();
        self.declarations
            .extend(specs.into_iter().map(|spec| (host, spec)));
        self
    }

    /// Declare every preference of a schema, with the schema type as host
    #[must_use]
    pub fn with_schema<T: PreferenceSchema + 'static>(self) -> Self {
        self.declare_all::<T>(T::declarations())
    }

    /// Choose which keys `clear_all` removes
    #[must_use]
    pub fn clear_scope(mut self, scope: ClearScope) -> Self {
        self.clear_scope = scope;
        self
    }

    /// Do not seed stores with defaults when they are attached
    ///
    /// Reads of keys missing from the store still fall back to the default.
    #[must_use]
    pub fn skip_default_merge(mut self) -> Self {
        self.skip_default_merge = true;
        self
    }

    /// Build the `PreferencesConfig`, applying declarations in order
    #[must_use]
    pub fn build(self) -> PreferencesConfig {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(PreferenceRegistry::new()));

        for (host, spec) in self.declarations {
            registry.declare(host, spec);
        }

        PreferencesConfig {
            registry,
            clear_scope: self.clear_scope,
            merge_defaults_on_init: !self.skip_default_merge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences;

    struct Settings;
    struct Profile;

    impl PreferenceSchema for Profile {
        fn declarations() -> Vec<PreferenceSpec> {
            preferences! {
                "nickname": String = "",
                "public": Boolean = false,
            }
        }
    }

    #[test]
    fn test_builder_basic() {
        let config = PreferencesConfig::builder().build();

        assert_eq!(config.clear_scope, ClearScope::StoredKeys);
        assert!(config.merge_defaults_on_init);
        assert!(config.registry.hosts().is_empty());
    }

    #[test]
    fn test_builder_with_options() {
        let config = PreferencesConfig::builder()
            .declare::<Settings>(PreferenceSpec::string("color", "red"))
            .with_schema::<Profile>()
            .clear_scope(ClearScope::DeclaredOnly)
            .skip_default_merge()
            .build();

        assert_eq!(config.clear_scope, ClearScope::DeclaredOnly);
        assert!(!config.merge_defaults_on_init);
        assert!(config.registry.contains(HostKey::of::<Settings>(), "color"));
        assert_eq!(
            config.registry.names_for(HostKey::of::<Profile>()),
            vec!["nickname", "public"]
        );
    }

    #[test]
    fn test_builder_shares_registry() {
        let registry = Arc::new(PreferenceRegistry::new());
        registry.declare_for::<Settings>(PreferenceSpec::string("color", "red"));

        let config = PreferencesConfig::builder()
            .registry(Arc::clone(&registry))
            .declare::<Settings>(PreferenceSpec::string("size", "M"))
            .build();

        assert!(Arc::ptr_eq(&config.registry, &registry));
        assert_eq!(
            registry.names_for(HostKey::of::<Settings>()),
            vec!["color", "size"]
        );
    }
}
