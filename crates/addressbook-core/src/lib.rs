//! Address Book Core Library
//!
//! This crate provides the core functionality of the address book: a
//! SQLite-backed contact store, seeded on first run, and the view models
//! that coordinate over a small event protocol.
//!
//! # Architecture
//!
//! - **SQLite**: Source of truth for contacts. Every operation opens its
//!   own connection, so any number of sessions can share one file.
//! - **Events**: Views never reference each other. A view's action yields
//!   a `ViewEvent` carrying at most a contact id; the session publishes it
//!   and subscribed views re-fetch from the store.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = ContactStore::open(&config)?;
//! store.initialize(&RandomUserSource::from_config(&config))?;
//!
//! let mut session = Session::new(store, config.page_size)?;
//! session.select_row(0);
//! session.begin_edit();
//! session.form_mut().set_field(Field::Email, "me@example.com")?;
//! session.save()?;
//! ```
//!
//! # Modules
//!
//! - `store`: Contact store (main entry point)
//! - `models`: The `Contact` record
//! - `storage`: SQLite schema and store errors
//! - `seed`: Sources of initial contacts
//! - `events`: Coordination events and their wire form
//! - `bus`: Publish/subscribe channel for events
//! - `views`: List and form view models
//! - `session`: Views wired together over one bus
//! - `config`: Application configuration

pub mod bus;
pub mod config;
pub mod events;
pub mod models;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod views;

pub use bus::{EventBus, SubscriptionId};
pub use config::Config;
pub use events::{EventError, EventKind, ViewEvent};
pub use models::{Contact, ContactId};
pub use seed::{NoSeed, RandomUserSource, SeedError, SeedSource};
pub use session::Session;
pub use storage::{StoreError, StoreResult};
pub use store::{ContactStore, StorageStats};
pub use views::{
    Column, ContactFormView, ContactListView, Field, FormError, FormFields, ViewMode, WindowState,
};
