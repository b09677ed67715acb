pub mod migrations;
pub mod queries;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use rusqlite::Connection;

pub fn init_storage(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open device storage")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("failed to set storage pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Key/value store persisted on the device.
#[derive(Clone)]
pub struct Storage {
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::from_connection(init_storage(path)?))
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        Self::open(":memory:")
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_item(&self, key: &str) -> rusqlite::Result<Option<String>> {
        queries::get_item(&self.conn(), key)
    }

    pub fn set_item(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        queries::set_item(&self.conn(), key, value)
    }

    pub fn remove_item(&self, key: &str) -> rusqlite::Result<()> {
        queries::remove_item(&self.conn(), key)
    }

    /// Writes all pairs in one transaction.
    pub fn multi_set(&self, pairs: &[(&str, &str)]) -> rusqlite::Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for (key, value) in pairs {
            queries::set_item(&tx, key, value)?;
        }
        tx.commit()
    }

    /// Removes all keys in one transaction.
    pub fn multi_remove(&self, keys: &[&str]) -> rusqlite::Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for key in keys {
            queries::remove_item(&tx, key)?;
        }
        tx.commit()
    }
}
