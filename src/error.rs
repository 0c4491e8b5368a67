//! Error types for the preferable library

use crate::config::PreferenceType;
use thiserror::Error;

/// Result type alias for preference operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the preferable library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Declaration Errors
    // -------------------------------------------------------------------------
    #[error("{0} preference not defined")]
    UndeclaredPreference(String),

    // -------------------------------------------------------------------------
    // Coercion Errors
    // -------------------------------------------------------------------------
    #[error("Cannot coerce value to {pref_type}: {reason}")]
    Coercion {
        pref_type: PreferenceType,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Preference store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Key not found in preference store: {0}")]
    KeyNotFound(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse preference value: {0}")]
    Parse(String),
}

impl Error {
    /// Shorthand for a coercion failure
    pub(crate) fn coercion(pref_type: PreferenceType, reason: impl Into<String>) -> Self {
        Error::Coercion {
            pref_type,
            reason: reason.into(),
        }
    }

    /// Check if this error reports an access to a preference that was never declared
    #[must_use]
    pub fn is_undeclared(&self) -> bool {
        matches!(self, Error::UndeclaredPreference(_))
    }

    /// Check if this error came from typecasting a value
    #[must_use]
    pub fn is_coercion_error(&self) -> bool {
        matches!(self, Error::Coercion { .. })
    }

    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UndeclaredPreference(_) | Error::KeyNotFound(_))
    }
}
