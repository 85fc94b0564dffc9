//! SQLite storage for todos.

pub mod tasks;

use anyhow::{Result, bail};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parse a connection string.
    ///
    /// Accepts `sqlite://<path>`, `sqlite:<path>`, a bare path, and
    /// `:memory:` in any of those forms. A `?query` suffix is ignored.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if rest.contains("://") {
            bail!("Unsupported database URL '{}': only sqlite is supported", url);
        }

        let rest = rest.split('?').next().unwrap_or_default();
        if rest.is_empty() {
            bail!("Database URL '{}' does not name a database", url);
        }

        if rest == ":memory:" {
            Ok(Self::Memory)
        } else {
            Ok(Self::File(PathBuf::from(rest)))
        }
    }
}

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database a connection string points at, creating the schema
    /// if it is missing.
    pub fn connect(url: &str) -> Result<Self> {
        match DatabaseLocation::parse(url)? {
            DatabaseLocation::Memory => Self::open_in_memory(),
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Self::open(path)
            }
        }
    }

    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )?;

        Self::init(conn)
    }

    /// Open an in-memory database (tests and `:memory:` URLs).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Create the schema if it does not exist yet.
    fn run_migrations(&self) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("connection lock poisoned: {}", e))?;
        let report = embedded::migrations::runner().run(&mut *conn)?;
        for migration in report.applied_migrations() {
            tracing::info!(migration = %migration, "Applied migration");
        }
        Ok(())
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self.conn.lock().map_err(StoreError::unavailable)?;
        f(&conn)
    }
}
