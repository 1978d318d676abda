use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::paths::{default_data_root, store_path};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Key/value records in a single SQLite table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and its parent directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::io("creating store directory", parent, source))?;
        }
        let conn = Connection::open(path)
            .map_err(|source| StoreError::sqlite("opening database", source))?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Opens `<dir>/store.db`, with the platform data directory when `dir` is `None`.
    pub fn open_in_dir(dir: Option<&Path>) -> Result<Self, StoreError> {
        let root = dir.map(Path::to_path_buf).unwrap_or_else(default_data_root);
        Self::open(store_path(&root))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|source| StoreError::sqlite("opening in-memory database", source))?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|source| StoreError::sqlite("creating kv table", source))?;
        Ok(Self { conn, path })
    }

    /// Backing file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| StoreError::sqlite("reading record", source))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
                params![key, value],
            )
            .map_err(|source| StoreError::sqlite("writing record", source))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|source| StoreError::sqlite("removing record", source))?;
        Ok(())
    }
}
