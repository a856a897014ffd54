use anyhow::{Context, Result};
use rusqlite::Connection;
use std::cell::RefCell;

use crate::db::repository::SnapshotRepo;
use crate::models::Snapshot;

/// Durable home for the engine snapshot. Last write wins.
pub trait StateStore {
    /// The raw stored blob, if any.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Snapshot stored as a JSON row in SQLite.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl StateStore for SqliteStore<'_> {
    fn load(&self) -> Result<Option<String>> {
        SnapshotRepo::get(self.conn)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let body = snapshot.to_json().context("Serializing snapshot")?;
        SnapshotRepo::put(self.conn, snapshot.version, &body)
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(raw: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(raw.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.blob.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let body = snapshot.to_json().context("Serializing snapshot")?;
        *self.blob.borrow_mut() = Some(body);
        Ok(())
    }
}
