//! Init command handler

use anyhow::Result;

use addressbook_core::{Config, ContactStore};

use crate::commands::{seed_source, with_hint};
use crate::output::{Output, OutputFormat};

/// Create the database and seed it if it is empty
pub fn run(config: &Config, output: &Output) -> Result<()> {
    let store = ContactStore::open(config).map_err(|e| {
        with_hint(e, format!("Failed to open contact store in {:?}", config.data_dir))
    })?;
    let seeded = store
        .initialize(seed_source(config).as_ref())
        .map_err(|e| with_hint(e, "Failed to initialize contact store".to_string()))?;
    let total = store.count()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "database": store.path(),
                    "seeded": seeded,
                    "contacts": total
                })
            );
        }
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            println!("Database: {}", store.path().display());
            if seeded > 0 {
                output.success(&format!("Seeded {} contact(s)", seeded));
            } else if total > 0 {
                println!("Already initialized with {} contact(s).", total);
            } else if config.seed_enabled {
                println!("Seed source unavailable; the store is empty.");
                println!(
                    "Check connectivity to {} or add contacts with `addressbook add`.",
                    config.seed_url
                );
            } else {
                println!("Seeding is disabled; the store is empty.");
            }
        }
    }

    Ok(())
}
