// Basic usage example for preferable
//
// Run with: cargo run --example basic_usage

use preferable::{
    preferences, MemoryStore, Preferable, PreferenceAccessor, PreferenceSchema, PreferenceSpec,
    PreferencesConfig,
};
use serde_json::json;

// A host type owning per-instance preferences
struct User {
    name: String,
    prefs: PreferenceAccessor,
}

impl PreferenceSchema for User {
    fn declarations() -> Vec<PreferenceSpec> {
        preferences! {
            "color": String = "red",
            "temperature": Integer = 21,
            "notify": Boolean = true,
            "languages": Array = json!(["en"]),
            "shortcuts": Hash = json!({}),
            "balance": Decimal = "0.00",
        }
    }
}

impl Preferable for User {
    type Store = MemoryStore;

    fn preferences(&self) -> &PreferenceAccessor {
        &self.prefs
    }

    fn preferences_mut(&mut self) -> &mut PreferenceAccessor {
        &mut self.prefs
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = PreferencesConfig::builder().with_schema::<User>().build();

    println!("📦 preferable Basic Usage Example\n");

    // Attach a store previously saved as JSON; missing defaults are merged in
    let saved = MemoryStore::from_json(r#"{"color": "green"}"#)?;
    let mut user = User {
        name: "alice".to_string(),
        prefs: config.attach::<User, _>(saved)?,
    };

    println!("✅ Preferences for {}:", user.name);
    println!("{}\n", serde_json::to_string_pretty(&user.preferences().snapshot()?)?);

    // Values are typecast on assignment
    println!("🔧 Assigning loosely typed values...");
    user.set_preference("temperature", "24")?;
    user.set_preference("notify", "false")?;
    user.set_preference("languages", "tr")?;
    user.set_preference("shortcuts", json!(["save", "ctrl+s", "quit", "ctrl+q"]))?;
    user.set_preference("balance", "19.990")?;
    println!("{}\n", serde_json::to_string_pretty(&user.preferences().snapshot()?)?);

    // Undeclared names are rejected
    if let Err(e) = user.get_preference("size") {
        println!("⚠️  {e}\n");
    }

    // Introspection
    for name in user.defined_preferences() {
        println!(
            "  {name}: {} (default {})",
            user.preference_type(&name)?,
            user.preference_default(&name)?
        );
    }

    // Persist the store as a single JSON blob
    let blob = user.prefs.into_store().to_json()?;
    println!("\n💾 Saved store: {blob}");

    Ok(())
}
