//! Seeding a store with declared defaults
//!
//! Stored values always win: a store loaded from durable state keeps its
//! customizations and only gains the keys it is missing.

use crate::error::Result;
use crate::store::PreferenceStore;
use log::debug;
use serde_json::{Map, Value};

/// Write each default the store does not already hold
///
/// Idempotent: a second run finds every key present and writes nothing.
/// Returns the number of keys written.
///
/// # Errors
///
/// Propagates store failures unchanged; keys written before the failure stay
/// written.
pub fn merge_defaults<S>(store: &mut S, defaults: Map<String, Value>) -> Result<usize>
where
    S: PreferenceStore + ?Sized,
{
    let mut inserted = 0;
    for (name, value) in defaults {
        if store.contains(&name)? {
            continue;
        }
        store.set(&name, value)?;
        inserted += 1;
    }

    debug!("Merged {inserted} default preference(s) into store");
    Ok(inserted)
}
