//! Declaration types and configuration
//!
//! This module contains the foundational types for declaring preferences:
//! - `PreferenceType` - Closed set of declarable types
//! - `PreferenceSpec` - Name, type and default of one preference
//! - `PreferenceSchema` - Trait for types declaring a fixed set of preferences
//! - `PreferencesConfig` - Registry and policies shared by every accessor

mod schema;
mod types;

pub use schema::{DefaultFn, PreferenceDefault, PreferenceSchema, PreferenceSpec, PreferenceType};

pub use types::{ClearScope, PreferencesConfig, PreferencesConfigBuilder};
