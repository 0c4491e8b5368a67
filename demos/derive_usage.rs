// Derive macro usage example for preferable
//
// Run with: cargo run --example derive_usage --features derive

use preferable::{MemoryStore, PreferenceSchema, PreferencesConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Preferences defined using the derive macro
// =============================================================================

/// Notification preferences for an account
#[derive(Debug, Clone, Serialize, Deserialize, PreferenceSchema)]
pub struct AccountPreferences {
    pub email_digest: bool,

    #[preference(name = "digest-hour")]
    #[serde(rename = "digest-hour")]
    pub digest_hour: u8,

    #[preference(kind = "password")]
    pub webhook_secret: String,

    pub channels: Vec<String>,

    pub labels: HashMap<String, String>,

    #[preference(skip)]
    #[serde(skip)]
    pub last_sent: Option<u64>,
}

impl Default for AccountPreferences {
    fn default() -> Self {
        Self {
            email_digest: true,
            digest_hour: 8,
            webhook_secret: String::new(),
            channels: vec!["email".to_string()],
            labels: HashMap::new(),
            last_sent: None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📦 preferable Derive Usage Example\n");

    println!("📋 Declared preferences:");
    for spec in AccountPreferences::declarations() {
        println!("  {} ({})", spec.name, spec.pref_type);
    }

    let config = PreferencesConfig::builder()
        .with_schema::<AccountPreferences>()
        .build();
    let mut prefs = config.attach::<AccountPreferences, _>(MemoryStore::new())?;

    println!("\n🔧 Updating preferences...");
    prefs.set("digest-hour", "18")?;
    prefs.set("channels", "slack")?;
    prefs.set("email_digest", "f")?;

    let loaded: AccountPreferences = prefs.load()?;
    println!("✅ Loaded: {loaded:#?}");

    Ok(())
}
