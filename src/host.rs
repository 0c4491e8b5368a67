//! Host-side convenience trait
//!
//! Types that own a [`PreferenceAccessor`] implement [`Preferable`] to expose
//! the preference operations as methods on themselves.

use crate::accessor::PreferenceAccessor;
use crate::config::PreferenceType;
use crate::error::Result;
use crate::store::PreferenceStore;
use serde_json::{Map, Value};

/// A type carrying per-instance preferences
///
/// # Example
///
/// ```rust
/// use preferable::{MemoryStore, Preferable, PreferenceAccessor, PreferenceSpec, PreferencesConfig};
/// use serde_json::json;
///
/// struct User {
///     prefs: PreferenceAccessor,
/// }
///
/// impl Preferable for User {
///     type Store = MemoryStore;
///
///     fn preferences(&self) -> &PreferenceAccessor {
///         &self.prefs
///     }
///
///     fn preferences_mut(&mut self) -> &mut PreferenceAccessor {
///         &mut self.prefs
///     }
/// }
///
/// let config = PreferencesConfig::builder()
///     .declare::<User>(PreferenceSpec::string("color", "red"))
///     .build();
///
/// let mut user = User { prefs: config.attach::<User, _>(MemoryStore::new())? };
/// user.set_preference("color", "blue")?;
/// assert_eq!(user.get_preference("color")?, json!("blue"));
/// # Ok::<(), preferable::Error>(())
/// ```
pub trait Preferable {
    /// Store backing the preferences
    type Store: PreferenceStore;

    /// Borrow the accessor
    fn preferences(&self) -> &PreferenceAccessor<Self::Store>;

    /// Mutably borrow the accessor
    fn preferences_mut(&mut self) -> &mut PreferenceAccessor<Self::Store>;

    /// See [`PreferenceAccessor::get`]
    fn get_preference(&self, name: &str) -> Result<Value> {
        self.preferences().get(name)
    }

    /// See [`PreferenceAccessor::set`]
    fn set_preference(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.preferences_mut().set(name, value)
    }

    /// See [`PreferenceAccessor::type_of`]
    fn preference_type(&self, name: &str) -> Result<PreferenceType> {
        self.preferences().type_of(name)
    }

    /// See [`PreferenceAccessor::default_of`]
    fn preference_default(&self, name: &str) -> Result<Value> {
        self.preferences().default_of(name)
    }

    /// See [`PreferenceAccessor::has`]
    fn has_preference(&self, name: &str) -> bool {
        self.preferences().has(name)
    }

    /// See [`PreferenceAccessor::declared_names`]
    fn defined_preferences(&self) -> Vec<String> {
        self.preferences().declared_names()
    }

    /// See [`PreferenceAccessor::defaults_snapshot`]
    fn default_preferences(&self) -> Result<Map<String, Value>> {
        self.preferences().defaults_snapshot()
    }

    /// See [`PreferenceAccessor::clear_all`]
    fn clear_preferences(&mut self) -> Result<usize> {
        self.preferences_mut().clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PreferenceSpec, PreferencesConfig};
    use crate::store::MemoryStore;
    use serde_json::json;

    struct Account {
        prefs: PreferenceAccessor,
    }

    impl Preferable for Account {
        type Store = MemoryStore;

        fn preferences(&self) -> &PreferenceAccessor {
            &self.prefs
        }

        fn preferences_mut(&mut self) -> &mut PreferenceAccessor {
            &mut self.prefs
        }
    }

    fn account() -> Account {
        let config = PreferencesConfig::builder()
            .declare::<Account>(PreferenceSpec::password("pin", "0000"))
            .declare::<Account>(PreferenceSpec::boolean("locked", false))
            .build();
        Account {
            prefs: config.attach::<Account, _>(MemoryStore::new()).unwrap(),
        }
    }

    #[test]
    fn test_provided_methods() {
        let mut account = account();

        account.set_preference("locked", 1).unwrap();
        assert_eq!(account.get_preference("locked").unwrap(), json!(true));
        assert_eq!(
            account.preference_type("pin").unwrap(),
            PreferenceType::Password
        );
        assert_eq!(account.preference_default("pin").unwrap(), json!("0000"));
        assert!(account.has_preference("pin"));
        assert_eq!(account.defined_preferences(), vec!["pin", "locked"]);
        assert_eq!(
            Value::Object(account.default_preferences().unwrap()),
            json!({"pin": "0000", "locked": false})
        );
    }

    #[test]
    fn test_set_preference_accepts_plain_values() {
        let mut account = account();

        account.set_preference("pin", String::from("4321")).unwrap();
        account.set_preference("locked", true).unwrap();

        assert_eq!(account.get_preference("pin").unwrap(), json!("4321"));
        assert_eq!(account.get_preference("locked").unwrap(), json!(true));
    }

    #[test]
    fn test_clear_preferences() {
        let mut account = account();

        assert_eq!(account.clear_preferences().unwrap(), 2);
        assert!(account.preferences().store().is_empty());
    }
}
