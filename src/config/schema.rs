//! Preference declarations: types, specs and the schema trait
//!
//! # Overview
//!
//! A host type declares its preferences as a list of [`PreferenceSpec`]s. Each
//! spec carries three things:
//!
//! - a **name**, unique per host type
//! - a [`PreferenceType`] that decides how written values are typecast
//! - a **default**, either a literal JSON value or a closure evaluated when the
//!   default is materialized
//!
//! Defaults are always passed through the coercer before they reach a store,
//! so `PreferenceSpec::integer("retries", 3)` and
//! `PreferenceSpec::new("retries", PreferenceType::Integer, "3")` behave the same.
//!
//! ```rust
//! use preferable::{PreferenceSpec, PreferenceType, preferences};
//! use serde_json::json;
//!
//! let specs = preferences! {
//!     "color": String = "red",
//!     "temperature": Integer = 21,
//!     "tags": Array = json!(["a", "b"]),
//! };
//! assert_eq!(specs.len(), 3);
//! assert_eq!(specs[1].pref_type, PreferenceType::Integer);
//!
//! let spec = PreferenceSpec::decimal("rate", "0.25");
//! assert_eq!(spec.coerced_default().unwrap().to_string(), "0.25");
//! ```

use crate::coerce::coerce;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Preference Types
// =============================================================================

/// Declared type of a preference, deciding how values are typecast on write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PreferenceType {
    /// Short string
    String,
    /// Long-form string
    Text,
    /// String, kept apart so callers can mask it
    Password,
    /// Arbitrary-precision decimal number
    Decimal,
    /// Whole number
    Integer,
    /// True/false flag
    Boolean,
    /// Sequence of values
    Array,
    /// String-keyed mapping
    Hash,
    /// Stored exactly as given
    #[default]
    Raw,
}

impl PreferenceType {
    /// Every declarable type, in declaration order
    pub const ALL: [PreferenceType; 9] = [
        PreferenceType::String,
        PreferenceType::Text,
        PreferenceType::Password,
        PreferenceType::Decimal,
        PreferenceType::Integer,
        PreferenceType::Boolean,
        PreferenceType::Array,
        PreferenceType::Hash,
        PreferenceType::Raw,
    ];

    /// Lowercase type name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceType::String => "string",
            PreferenceType::Text => "text",
            PreferenceType::Password => "password",
            PreferenceType::Decimal => "decimal",
            PreferenceType::Integer => "integer",
            PreferenceType::Boolean => "boolean",
            PreferenceType::Array => "array",
            PreferenceType::Hash => "hash",
            PreferenceType::Raw => "raw",
        }
    }

    /// Whether values of this type are stored as strings
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            PreferenceType::String | PreferenceType::Text | PreferenceType::Password
        )
    }
}

impl fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type names are matched case-insensitively; unknown names become [`PreferenceType::Raw`]
impl From<&str> for PreferenceType {
    fn from(name: &str) -> Self {
        PreferenceType::ALL
            .into_iter()
            .find(|ty| name.trim().eq_ignore_ascii_case(ty.as_str()))
            .unwrap_or_else(|| {
                log::debug!("Unrecognized preference type '{name}', treating as raw");
                PreferenceType::Raw
            })
    }
}

impl From<String> for PreferenceType {
    fn from(name: String) -> Self {
        PreferenceType::from(name.as_str())
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Closure producing a default value on demand
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Raw (uncoerced) default of a preference
#[derive(Clone)]
pub enum PreferenceDefault {
    /// Literal value, fixed at declaration time
    Value(Value),
    /// Evaluated every time the default is materialized
    Computed(DefaultFn),
}

impl PreferenceDefault {
    /// Materialize the raw default
    #[must_use]
    pub fn materialize(&self) -> Value {
        match self {
            PreferenceDefault::Value(value) => value.clone(),
            PreferenceDefault::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for PreferenceDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            PreferenceDefault::Computed(_) => f.write_str("Computed(Fn)"),
        }
    }
}

impl Default for PreferenceDefault {
    fn default() -> Self {
        PreferenceDefault::Value(Value::Null)
    }
}

impl From<Value> for PreferenceDefault {
    fn from(value: Value) -> Self {
        PreferenceDefault::Value(value)
    }
}

// =============================================================================
// Preference Spec
// =============================================================================

/// Declared metadata for one preference, independent of any instance's value
#[derive(Debug, Clone, Default)]
pub struct PreferenceSpec {
    /// Identifier, unique within a host type
    pub name: String,

    /// Declared type
    pub pref_type: PreferenceType,

    /// Raw default, coerced on use
    pub default: PreferenceDefault,
}

impl PreferenceSpec {
    /// Create a spec with a literal default
    pub fn new(name: impl Into<String>, pref_type: PreferenceType, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            pref_type,
            default: PreferenceDefault::Value(default.into()),
        }
    }

    /// Create a spec whose default is computed each time it is materialized
    pub fn computed<F>(name: impl Into<String>, pref_type: PreferenceType, default: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            pref_type,
            default: PreferenceDefault::Computed(Arc::new(default)),
        }
    }

    /// Create a spec from any serializable default
    ///
    /// Used by the derive macro, where defaults come from the struct's `Default`.
    /// A default whose `Serialize` impl fails is logged at warn level and
    /// declared as `null`, so it reads as the type's empty value.
    pub fn from_serializable<T: Serialize + ?Sized>(
        name: impl Into<String>,
        pref_type: PreferenceType,
        default: &T,
    ) -> Self {
        let name = name.into();
        let value = serde_json::to_value(default).unwrap_or_else(|e| {
            log::warn!("Default for preference '{name}' could not be serialized: {e}");
            Value::Null
        });
        Self::new(name, pref_type, value)
    }

    // =========================================================================
    // Type-specific constructors
    // =========================================================================

    /// String preference
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, PreferenceType::String, default.into())
    }

    /// Long-form text preference
    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, PreferenceType::Text, default.into())
    }

    /// Password preference
    pub fn password(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, PreferenceType::Password, default.into())
    }

    /// Decimal preference; the default may be a number or numeric text
    pub fn decimal(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, PreferenceType::Decimal, default)
    }

    /// Integer preference
    pub fn integer(name: impl Into<String>, default: i64) -> Self {
        Self::new(name, PreferenceType::Integer, default)
    }

    /// Boolean preference
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, PreferenceType::Boolean, default)
    }

    /// Array preference
    pub fn array(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, PreferenceType::Array, default)
    }

    /// Hash preference
    pub fn hash(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, PreferenceType::Hash, default)
    }

    /// Raw preference, stored exactly as given
    pub fn raw(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(name, PreferenceType::Raw, default)
    }

    // =========================================================================
    // Default materialization
    // =========================================================================

    /// Whether the default is computed on demand
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self.default, PreferenceDefault::Computed(_))
    }

    /// Default before typecasting
    #[must_use]
    pub fn raw_default(&self) -> Value {
        self.default.materialize()
    }

    /// Default after typecasting to the declared type
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`](crate::Error::Coercion) if the declared
    /// default cannot be typecast (e.g. an odd-length array for a hash).
    pub fn coerced_default(&self) -> Result<Value> {
        coerce(self.raw_default(), self.pref_type)
    }
}

// =============================================================================
// Preference Schema Trait
// =============================================================================

/// Trait for types that declare a fixed set of preferences
///
/// Implement it by hand (the [`preferences!`](crate::preferences) macro keeps
/// that short) or with `#[derive(PreferenceSchema)]` behind the `derive` feature.
pub trait PreferenceSchema {
    /// Every preference this type declares, in display order
    fn declarations() -> Vec<PreferenceSpec>;

    /// Declared names, in display order
    #[must_use]
    fn preference_names() -> Vec<String> {
        Self::declarations().into_iter().map(|s| s.name).collect()
    }
}

impl PreferenceSchema for () {
    fn declarations() -> Vec<PreferenceSpec> {
        Vec::new()
    }
}

/// Macro for declaring a list of preferences
///
/// Each entry is `"name": Type = default`, where `Type` is a
/// [`PreferenceType`] variant and `default` is anything convertible into a
/// `serde_json::Value`.
///
/// # Example
/// ```rust
/// use preferable::{preferences, PreferenceSchema, PreferenceSpec};
///
/// struct Settings;
///
/// impl PreferenceSchema for Settings {
///     fn declarations() -> Vec<PreferenceSpec> {
///         preferences! {
///             "color": String = "red",
///             "temperature": Integer = 21,
///             "notify": Boolean = true,
///         }
///     }
/// }
///
/// assert_eq!(Settings::preference_names(), vec!["color", "temperature", "notify"]);
/// ```
#[macro_export]
macro_rules! preferences {
    ($($name:literal : $ty:ident = $default:expr),* $(,)?) => {{
        let specs: ::std::vec::Vec<$crate::PreferenceSpec> = vec![
            $($crate::PreferenceSpec::new($name, $crate::PreferenceType::$ty, $default)),*
        ];
        specs
    }};
}

// =============================================================================
// Tests
// =============================================================================
