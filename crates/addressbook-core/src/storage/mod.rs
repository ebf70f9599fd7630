//! Storage layer
//!
//! SQLite schema and the typed errors surfaced by the contact store.
//!
//! The database lives in a single file under the configured data
//! directory. Connections are short-lived: the store opens one per
//! operation and drops it before returning.

pub mod error;
pub mod schema;

pub use error::{StoreError, StoreResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
