//! Common test utilities for preferable integration tests
//!
//! Provides a shared host type, its declarations, and a store that fails on
//! demand.

#![allow(dead_code)]

use preferable::{
    preferences, Error, MemoryStore, PreferenceAccessor, PreferenceSchema, PreferenceSpec,
    PreferenceStore, PreferencesConfig, Result,
};
use serde_json::{json, Value};

// =============================================================================
// Test Host
// =============================================================================

/// Host type covering every declarable preference type
pub struct TestUser;

impl PreferenceSchema for TestUser {
    fn declarations() -> Vec<PreferenceSpec> {
        preferences! {
            "color": String = "red",
            "bio": Text = "",
            "pin": Password = "0000",
            "balance": Decimal = "10.25",
            "temperature": Integer = 21,
            "notify": Boolean = true,
            "languages": Array = json!(["en"]),
            "shortcuts": Hash = json!({}),
            "layout": Raw = json!({"columns": 2}),
        }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture holding a config and an accessor attached to a fresh store
pub struct TestFixture {
    pub config: PreferencesConfig,
    pub prefs: PreferenceAccessor,
}

impl TestFixture {
    /// Create a new test fixture with default configuration
    pub fn new() -> Self {
        let config = PreferencesConfig::builder()
            .with_schema::<TestUser>()
            .build();
        Self::with_config(config)
    }

    /// Create a fixture around an existing config
    pub fn with_config(config: PreferencesConfig) -> Self {
        let prefs = config
            .attach::<TestUser, _>(MemoryStore::new())
            .expect("Failed to attach store");
        Self { config, prefs }
    }

    /// Attach a store preloaded from JSON, as if loaded from saved state
    pub fn from_saved(json: &str) -> Self {
        let config = PreferencesConfig::builder()
            .with_schema::<TestUser>()
            .build();
        let store = MemoryStore::from_json(json).expect("Invalid saved store");
        let prefs = config
            .attach::<TestUser, _>(store)
            .expect("Failed to attach store");
        Self { config, prefs }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// Store whose reads and writes can be switched off
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FlakyStore {
    fn unavailable() -> Error {
        Error::StoreUnavailable("backend offline".to_string())
    }
}

impl PreferenceStore for FlakyStore {
    fn fetch(&self, key: &str) -> Result<Option<Value>> {
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        self.inner.fetch(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        self.inner.delete(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        self.inner.keys()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Initialize logging once per test binary; repeated calls are ignored
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
