//! Integration tests for preferable-derive macro
//!
//! Tests the `#[derive(PreferenceSchema)]` macro with various attribute combinations.

use preferable::{MemoryStore, PreferenceSchema, PreferenceType, PreferencesConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Basic Derive Tests
// =============================================================================

#[derive(Serialize, Deserialize, PreferenceSchema)]
struct BasicPreferences {
    color: String,
    notify: bool,
    max_items: u32,
    ratio: f64,
}

impl Default for BasicPreferences {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
            notify: true,
            max_items: 50,
            ratio: 0.5,
        }
    }
}

#[test]
fn test_basic_derive() {
    let specs = BasicPreferences::declarations();

    assert_eq!(
        BasicPreferences::preference_names(),
        vec!["color", "notify", "max_items", "ratio"]
    );

    let types: Vec<_> = specs.iter().map(|s| s.pref_type).collect();
    assert_eq!(
        types,
        vec![
            PreferenceType::String,
            PreferenceType::Boolean,
            PreferenceType::Integer,
            PreferenceType::Decimal,
        ]
    );

    assert_eq!(specs[0].coerced_default().unwrap(), json!("red"));
    assert_eq!(specs[1].coerced_default().unwrap(), json!(true));
    assert_eq!(specs[2].coerced_default().unwrap(), json!(50));
    assert_eq!(specs[3].coerced_default().unwrap().to_string(), "0.5");
}

// =============================================================================
// Collection Type Inference
// =============================================================================

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, PreferenceSchema)]
struct CollectionPreferences {
    languages: Vec<String>,
    tags: BTreeSet<String>,
    shortcuts: HashMap<String, String>,
    nickname: Option<String>,
    layout: Layout,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Layout {
    columns: u8,
}

#[test]
fn test_collection_inference() {
    let specs = CollectionPreferences::declarations();
    let types: Vec<_> = specs.iter().map(|s| s.pref_type).collect();

    assert_eq!(
        types,
        vec![
            PreferenceType::Array,
            PreferenceType::Array,
            PreferenceType::Hash,
            PreferenceType::Raw,
            PreferenceType::Raw,
        ]
    );

    assert_eq!(specs[3].coerced_default().unwrap(), json!(null));
    assert_eq!(specs[4].coerced_default().unwrap(), json!({"columns": 0}));
}

// =============================================================================
// Optional Fields
// =============================================================================

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, PreferenceSchema)]
struct OptionalPreferences {
    nickname: Option<String>,
    limit: Option<u32>,

    #[preference(kind = "integer")]
    retries: Option<u8>,
}

#[test]
fn test_optional_fields_keep_none() {
    let config = PreferencesConfig::builder()
        .with_schema::<OptionalPreferences>()
        .build();
    let prefs = config
        .attach::<OptionalPreferences, _>(MemoryStore::new())
        .unwrap();

    assert_eq!(prefs.type_of("nickname").unwrap(), PreferenceType::Raw);
    assert_eq!(prefs.get("limit").unwrap(), json!(null));

    let loaded: OptionalPreferences = prefs.load().unwrap();
    assert_eq!(
        loaded,
        OptionalPreferences {
            retries: Some(0),
            ..OptionalPreferences::default()
        }
    );
}

#[test]
fn test_optional_fields_roundtrip_values() {
    let config = PreferencesConfig::builder()
        .with_schema::<OptionalPreferences>()
        .build();
    let mut prefs = config
        .attach::<OptionalPreferences, _>(MemoryStore::new())
        .unwrap();

    prefs.set("nickname", "bob").unwrap();
    prefs.set("retries", "3").unwrap();

    let loaded: OptionalPreferences = prefs.load().unwrap();
    assert_eq!(loaded.nickname.as_deref(), Some("bob"));
    assert_eq!(loaded.limit, None);
    assert_eq!(loaded.retries, Some(3));
}

#[test]
fn test_load_after_attach_equals_default() {
    let config = PreferencesConfig::builder()
        .with_schema::<CollectionPreferences>()
        .build();
    let prefs = config
        .attach::<CollectionPreferences, _>(MemoryStore::new())
        .unwrap();

    let loaded: CollectionPreferences = prefs.load().unwrap();
    assert_eq!(loaded, CollectionPreferences::default());
}

// =============================================================================
// Field Attributes
// =============================================================================

#[derive(Default, Serialize, Deserialize, PreferenceSchema)]
struct AccountPreferences {
    #[preference(kind = "password")]
    pin: String,

    #[preference(kind = "text")]
    bio: String,

    #[preference(name = "max-sessions")]
    max_sessions: u16,

    #[preference(skip)]
    #[serde(skip)]
    cached_token: Option<String>,

    #[preference(kind = "Decimal", name = "credit")]
    credit_cents: i64,
}

#[test]
fn test_field_attributes() {
    let specs = AccountPreferences::declarations();

    assert_eq!(
        AccountPreferences::preference_names(),
        vec!["pin", "bio", "max-sessions", "credit"]
    );
    assert_eq!(specs[0].pref_type, PreferenceType::Password);
    assert_eq!(specs[1].pref_type, PreferenceType::Text);
    assert_eq!(specs[2].pref_type, PreferenceType::Integer);
    assert_eq!(specs[3].pref_type, PreferenceType::Decimal);
}

// =============================================================================
// Attaching a Derived Schema
// =============================================================================

#[test]
fn test_derived_schema_with_accessor() {
    let config = PreferencesConfig::builder()
        .with_schema::<BasicPreferences>()
        .build();
    let mut prefs = config
        .attach::<BasicPreferences, _>(MemoryStore::new())
        .unwrap();

    prefs.set("max_items", "75").unwrap();
    prefs.set("notify", "0").unwrap();

    let loaded: BasicPreferences = prefs.load().unwrap();
    assert_eq!(loaded.color, "red");
    assert!(!loaded.notify);
    assert_eq!(loaded.max_items, 75);
    assert!((loaded.ratio - 0.5).abs() < f64::EPSILON);
}
