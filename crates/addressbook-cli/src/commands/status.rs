//! Status command handler

use anyhow::Result;

use addressbook_core::{Config, ContactStore};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &ContactStore, config: &Config, output: &Output) -> Result<()> {
    let stats = store.stats();
    let count = store.count()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "seed_enabled": config.seed_enabled,
                    "seed_url": config.seed_url,
                    "storage": {
                        "database_path": stats.database_path,
                        "database_exists": stats.database_exists,
                        "database_size": stats.database_size
                    },
                    "counts": {
                        "contacts": count
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", count);
        }
        OutputFormat::Human => {
            println!("Address Book Status");
            println!("===================");
            println!();
            println!("Seeding:");
            println!(
                "  Status: {}",
                if config.seed_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Source: {}", config.seed_url);
            println!();
            println!("Storage:");
            println!("  Location: {}", stats.database_path.display());
            println!("  Size:     {}", stats.size_human());
            println!();
            println!("Contents:");
            println!("  Contacts: {}", count);
        }
    }

    Ok(())
}
