//! Contact storage
//!
//! The `ContactStore` owns the single `contacts` table. It is the only
//! owner of record lifetime; views keep disposable copies and re-fetch by
//! id whenever they are told something changed.
//!
//! ## Connections
//!
//! Every operation opens its own SQLite connection and drops it before
//! returning, on success and on failure alike. Several stores (or
//! processes) can therefore share one database file.
//!
//! ## Id assignment
//!
//! New ids are `max(id) + 1`. [`ContactStore::next_id`] followed by
//! [`ContactStore::create`] is not atomic: two callers may compute the same
//! id and the second insert fails with [`StoreError::DuplicateKey`].
//! [`ContactStore::create_next`] performs both steps in one immediate
//! transaction and produces the same ids without the race.
//!
//! ## Usage
//!
//! ```ignore
//! let store = ContactStore::open(&config)?;
//! store.initialize(&RandomUserSource::from_config(&config))?;
//!
//! let page = store.page(10, 0)?;
//! let contact = store.find_by_id(4)?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::{Contact, ContactId};
use crate::seed::SeedSource;
use crate::storage::{init_schema, needs_init, StoreError, StoreResult};

/// Date format of the `birthDate` column
const DATE_FORMAT: &str = "%Y-%m-%d";

/// How long a connection waits on a locked database
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str =
    "SELECT id, firstName, lastName, phoneNumber, email, birthDate, imageUrl FROM contacts";

/// Storage statistics for the status command
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub database_path: PathBuf,
    pub database_exists: bool,
    pub database_size: u64,
}

impl StorageStats {
    /// Human readable database size
    pub fn size_human(&self) -> String {
        let size = self.database_size as f64;
        if size < 1024.0 {
            format!("{} B", self.database_size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        }
    }
}

/// Durable storage for contacts
#[derive(Debug, Clone)]
pub struct ContactStore {
    db_path: PathBuf,
    seed_count: usize,
}

impl ContactStore {
    /// Open the store, creating the database file and table if needed
    ///
    /// Failure here is fatal: the caller has no store to fall back to.
    pub fn open(config: &Config) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir).map_err(|source| {
            error!(path = ?config.data_dir, %source, "Failed to create data directory");
            StoreError::CreateDirectory {
                path: config.data_dir.clone(),
                source,
            }
        })?;

        let store = Self {
            db_path: config.sqlite_path(),
            seed_count: config.seed_count,
        };
        store.ensure_schema()?;

        debug!(path = ?store.db_path, "Opened contact store");
        Ok(store)
    }

    /// Path of the backing database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Ensure the table exists and seed it when empty
    ///
    /// Contacts from the seed source get ids `1..=N` in source order.
    /// A failing seed source leaves the store empty; only storage faults
    /// are returned as errors. Returns the number of contacts seeded.
    pub fn initialize(&self, source: &dyn SeedSource) -> StoreResult<usize> {
        self.ensure_schema()?;

        if self.count()? > 0 {
            return Ok(0);
        }

        let contacts = match source.fetch(self.seed_count) {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(error = %e, "Seed source unavailable, starting with an empty store");
                return Ok(0);
            }
        };

        let seeded = self
            .try_seed(contacts)
            .map_err(log_failure("initialize"))?;
        info!(count = seeded, "Seeded contact store");
        Ok(seeded)
    }

    /// Total number of stored contacts
    pub fn count(&self) -> StoreResult<i64> {
        self.try_count().map_err(log_failure("count"))
    }

    /// The id the next created contact should use: `max(id) + 1`, or 1
    ///
    /// Nothing is reserved; see the module docs for the race this leaves.
    pub fn next_id(&self) -> StoreResult<ContactId> {
        self.connect()
            .and_then(|conn| Ok(next_id_on(&conn)?))
            .map_err(log_failure("next_id"))
    }

    /// All contacts in storage order
    pub fn list(&self) -> StoreResult<Vec<Contact>> {
        self.try_query(&format!("{SELECT_COLUMNS} ORDER BY id"), params![])
            .map_err(log_failure("list"))
    }

    /// Contacts in the window `[offset, offset + limit)` of storage order
    ///
    /// An offset beyond what SQLite can address is past the end: the
    /// window is empty.
    pub fn page(&self, limit: usize, offset: usize) -> StoreResult<Vec<Contact>> {
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.try_query(
            &format!("{SELECT_COLUMNS} ORDER BY id LIMIT ?1 OFFSET ?2"),
            params![limit, offset],
        )
        .map_err(log_failure("page"))
    }

    /// Look up a contact; a missing id is `Ok(None)`, not an error
    pub fn find_by_id(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        self.try_find(id).map_err(log_failure("find_by_id"))
    }

    /// Insert a contact with a caller-chosen id
    ///
    /// Fails with [`StoreError::DuplicateKey`] if the id is taken; the
    /// existing record is left untouched.
    pub fn create(&self, contact: &Contact) -> StoreResult<()> {
        self.connect()
            .and_then(|conn| insert_on(&conn, contact))
            .map_err(log_failure("create"))?;
        debug!(id = contact.id, "Created contact");
        Ok(())
    }

    /// Insert a contact, assigning it the next id atomically
    ///
    /// The id on `contact` is ignored. Returns the stored record.
    pub fn create_next(&self, contact: &Contact) -> StoreResult<Contact> {
        let stored = self
            .try_create_next(contact)
            .map_err(log_failure("create_next"))?;
        debug!(id = stored.id, "Created contact");
        Ok(stored)
    }

    /// Overwrite every field of the stored record with the same id
    ///
    /// Fails with [`StoreError::NotFound`] if there is no such record.
    pub fn update(&self, contact: &Contact) -> StoreResult<()> {
        self.try_update(contact).map_err(log_failure("update"))?;
        debug!(id = contact.id, "Updated contact");
        Ok(())
    }

    /// Delete a contact. Returns false (and does nothing) if it is absent.
    pub fn remove(&self, id: ContactId) -> StoreResult<bool> {
        let removed = self
            .connect()
            .and_then(|conn| Ok(conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?))
            .map_err(log_failure("remove"))?;
        debug!(id, removed = removed > 0, "Removed contact");
        Ok(removed > 0)
    }

    /// File statistics of the backing database
    pub fn stats(&self) -> StorageStats {
        let metadata = std::fs::metadata(&self.db_path).ok();
        StorageStats {
            database_path: self.db_path.clone(),
            database_exists: metadata.is_some(),
            database_size: metadata.map(|m| m.len()).unwrap_or(0),
        }
    }

    // ==================== Private helpers ====================

    /// Open a fresh connection for one operation
    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.db_path).map_err(|source| {
            StoreError::StorageUnavailable {
                path: self.db_path.clone(),
                source,
            }
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn ensure_schema(&self) -> StoreResult<()> {
        let conn = self.connect().map_err(log_failure("open"))?;
        if needs_init(&conn) {
            init_schema(&conn).map_err(|source| {
                let e = StoreError::StorageUnavailable {
                    path: self.db_path.clone(),
                    source,
                };
                error!(error = %e, "Failed to initialize schema");
                e
            })?;
        }
        Ok(())
    }

    fn try_seed(&self, contacts: Vec<Contact>) -> StoreResult<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Another session may have seeded while the source was fetching
        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        if existing > 0 {
            debug!(existing, "Store seeded concurrently, skipping");
            return Ok(0);
        }

        let mut seeded = 0;
        for (i, contact) in contacts.into_iter().take(self.seed_count).enumerate() {
            insert_on(&tx, &contact.with_id(i as ContactId + 1))?;
            seeded += 1;
        }

        tx.commit()?;
        Ok(seeded)
    }

    fn try_count(&self) -> StoreResult<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?)
    }

    fn try_query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> StoreResult<Vec<Contact>> {
        let conn = self.connect()?;
        debug!(sql, "Querying contacts");
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, ContactRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ContactRow::into_contact).collect()
    }

    fn try_find(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                ContactRow::from_row,
            )
            .optional()?;

        row.map(ContactRow::into_contact).transpose()
    }

    fn try_create_next(&self, contact: &Contact) -> StoreResult<Contact> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let stored = contact.with_id(next_id_on(&tx)?);
        insert_on(&tx, &stored)?;

        tx.commit()?;
        Ok(stored)
    }

    fn try_update(&self, contact: &Contact) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            r#"
            UPDATE contacts
            SET firstName = ?2, lastName = ?3, phoneNumber = ?4,
                email = ?5, birthDate = ?6, imageUrl = ?7
            WHERE id = ?1
            "#,
            params![
                contact.id,
                contact.first_name,
                contact.last_name,
                contact.phone_number,
                contact.email,
                format_date(contact.birth_date),
                contact.image,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound { id: contact.id });
        }
        Ok(())
    }
}

// ==================== Internal structs ====================

struct ContactRow {
    id: ContactId,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
    birth_date: Option<String>,
    image: Option<String>,
}

impl ContactRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            phone_number: row.get(3)?,
            email: row.get(4)?,
            birth_date: row.get(5)?,
            image: row.get(6)?,
        })
    }

    fn into_contact(self) -> StoreResult<Contact> {
        let birth_date = match self.birth_date.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
                StoreError::InvalidRow {
                    id: self.id,
                    details: format!("birthDate '{}': {}", s, e),
                }
            })?),
            None => None,
        };

        Ok(Contact {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            email: self.email,
            birth_date,
            image: self.image.unwrap_or_default(),
        })
    }
}

// ==================== Statement helpers ====================

fn next_id_on(conn: &Connection) -> rusqlite::Result<ContactId> {
    conn.query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM contacts", [], |row| {
        row.get(0)
    })
}

fn insert_on(conn: &Connection, contact: &Contact) -> StoreResult<()> {
    conn.execute(
        r#"
        INSERT INTO contacts (id, firstName, lastName, phoneNumber, email, birthDate, imageUrl)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            contact.id,
            contact.first_name,
            contact.last_name,
            contact.phone_number,
            contact.email,
            format_date(contact.birth_date),
            contact.image,
        ],
    )
    .map_err(|e| {
        if StoreError::is_constraint_violation(&e) {
            StoreError::DuplicateKey { id: contact.id }
        } else {
            StoreError::Database(e)
        }
    })?;
    Ok(())
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Log a failed operation at the store boundary and pass the error on
fn log_failure(operation: &'static str) -> impl Fn(StoreError) -> StoreError {
    move |e| {
        match &e {
            StoreError::NotFound { .. } | StoreError::DuplicateKey { .. } => {
                warn!(operation, error = %e, "Contact store operation rejected");
            }
            _ => {
                error!(operation, error = %e, "Contact store operation failed");
            }
        }
        e
    }
}
