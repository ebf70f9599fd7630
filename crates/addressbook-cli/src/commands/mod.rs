//! Command handlers

pub mod config;
pub mod contact;
pub mod init;
pub mod status;

use anyhow::Result;

use addressbook_core::{Config, ContactStore, NoSeed, RandomUserSource, SeedSource, StoreError};

/// Seed source selected by the configuration
pub fn seed_source(config: &Config) -> Box<dyn SeedSource> {
    if config.seed_enabled {
        Box::new(RandomUserSource::from_config(config))
    } else {
        Box::new(NoSeed)
    }
}

/// Open the store and seed it if it is empty
pub fn open_store(config: &Config) -> Result<ContactStore> {
    let store = ContactStore::open(config).map_err(|e| {
        with_hint(e, format!("Failed to open contact store in {:?}", config.data_dir))
    })?;
    store
        .initialize(seed_source(config).as_ref())
        .map_err(|e| with_hint(e, "Failed to initialize contact store".to_string()))?;
    Ok(store)
}

/// Attach context, plus the store's recovery suggestion when it has one
pub fn with_hint(error: StoreError, context: String) -> anyhow::Error {
    match error.recovery_suggestion() {
        Some(hint) => anyhow::Error::new(error).context(format!("{}\n{}", context, hint)),
        None => anyhow::Error::new(error).context(context),
    }
}
