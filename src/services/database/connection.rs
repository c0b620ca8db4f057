use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

/// Wait this long for another `siga` process to release the file lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the SQLite connection behind the record store and the identity
/// provider.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the document store at `path`, or an in-memory one for `":memory:"`.
    pub fn new(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open document store at {}", path))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set busy timeout")?;

        log::debug!("Opened document store at {}", path);
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the `documents` and `credentials` tables if missing.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }
}
