//! # preferable - Declared, typecast per-instance preferences
//!
//! A small library for attaching typed preferences to host objects. A host
//! type declares named preferences with a type and a default; every instance
//! then owns a key-value store holding its own values.
//!
//! ## Features
//!
//! - **Declarations**: Name, type and default per preference, shared by every instance of a host type
//! - **Typecasting**: Assigned values are coerced to the declared type (`"24"` becomes `24` for integers)
//! - **Defaults**: Seeded into new stores without overwriting saved values
//! - **Pluggable Stores**: Anything implementing [`PreferenceStore`]; [`MemoryStore`] serializes to a JSON object
//! - **Schema Derive**: `#[derive(PreferenceSchema)]` from a struct with `Default` values (requires `derive` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use preferable::{MemoryStore, PreferenceSpec, PreferencesConfig};
//! use serde_json::json;
//!
//! struct User;
//!
//! let config = PreferencesConfig::builder()
//!     .declare::<User>(PreferenceSpec::string("color", "red"))
//!     .declare::<User>(PreferenceSpec::boolean("notify", true))
//!     .declare::<User>(PreferenceSpec::array("languages", json!(null)))
//!     .build();
//!
//! let mut prefs = config.attach::<User, _>(MemoryStore::new())?;
//!
//! prefs.set("notify", "false")?;
//! prefs.set("languages", "en")?;
//!
//! assert_eq!(prefs.get("color")?, json!("red"));
//! assert_eq!(prefs.get("notify")?, json!(false));
//! assert_eq!(prefs.get("languages")?, json!(["en"]));
//! # Ok::<(), preferable::Error>(())
//! ```
//!
//! ## Declaring a Schema
//!
//! ```rust
//! use preferable::{preferences, MemoryStore, PreferenceSchema, PreferenceSpec, PreferencesConfig};
//!
//! struct Thermostat;
//!
//! impl PreferenceSchema for Thermostat {
//!     fn declarations() -> Vec<PreferenceSpec> {
//!         preferences! {
//!             "temperature": Decimal = "21.5",
//!             "schedule": Hash = serde_json::json!({}),
//!         }
//!     }
//! }
//!
//! let config = PreferencesConfig::builder()
//!     .with_schema::<Thermostat>()
//!     .build();
//! let prefs = config.attach::<Thermostat, _>(MemoryStore::new())?;
//! assert_eq!(prefs.get("temperature")?.to_string(), "21.5");
//! # Ok::<(), preferable::Error>(())
//! ```
//!
//! ## Default Value Behavior
//!
//! When a store is attached, every declared default it does not hold yet is
//! written into it. Values already in the store are kept, so a store loaded
//! from saved state keeps its customizations and gains any newly declared
//! preferences. Reading a declared preference that is still missing (declared
//! after attachment, or merging disabled) returns its default.

// Core modules
mod accessor;
mod coerce;
mod error;
mod host;
mod merge;
mod registry;
mod store;

// Grouped modules
pub mod config;

// Re-exports from core
pub use accessor::PreferenceAccessor;
pub use coerce::{coerce, to_array, to_boolean, to_decimal, to_hash, to_integer, to_text};
pub use error::{Error, Result};
pub use host::Preferable;
pub use merge::merge_defaults;
pub use registry::{HostKey, PreferenceRegistry};
pub use store::{MemoryStore, PreferenceStore};

// Re-exports from config
pub use config::{
    ClearScope, DefaultFn, PreferenceDefault, PreferenceSchema, PreferenceSpec, PreferenceType,
    PreferencesConfig, PreferencesConfigBuilder,
};

// Derive macro re-export (requires `derive` feature)
/// Derive macro for generating `PreferenceSchema` implementations.
///
/// # Example
///
/// ```rust,ignore
/// use preferable::PreferenceSchema;
///
/// #[derive(Default, PreferenceSchema)]
/// struct UserPreferences {
///     color: String,
///     #[preference(kind = "password")]
///     pin: String,
/// }
/// ```
#[cfg(feature = "derive")]
pub use preferable_derive::PreferenceSchema;
