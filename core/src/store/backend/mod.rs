//! Key-value slots the story collection is persisted into.
//!
//! A slot holds one string value under a string key and is always overwritten
//! wholesale.

use redb::{ReadableDatabase, TableDefinition};
use std::collections::HashMap;
use std::path::Path;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum BackendError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }
}

use error::BackendError;

pub trait SlotBackend {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError>;
}

/// Slots table: &str → JSON string
const SLOTS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("slots");

/// Slots stored in a redb database file.
pub struct RedbSlots {
    db: redb::Database,
}

impl RedbSlots {
    /// Creates or opens the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = redb::Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SLOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl SlotBackend for RedbSlots {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;

        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SLOTS_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// In-memory slots. Counts writes so callers can observe redundant persistence.
#[derive(Debug, Default, Clone)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
    writes: usize,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a slot without counting it as a write.
    pub fn with_slot(mut self, key: &str, value: impl Into<String>) -> Self {
        self.slots.insert(key.to_string(), value.into());
        self
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SlotBackend for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
