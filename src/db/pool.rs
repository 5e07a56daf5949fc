//! SQLite connection wrapper (one connection per unit of work).

use crate::db::initialize::init_db;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Busy timeout used when the caller does not pick one.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the database; writers blocked for longer than `timeout` fail
    /// with a store-unavailable error.
    pub fn open(path: &str, timeout: Duration) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::configure(conn, timeout)
    }

    /// Open and bring the schema up to date.
    pub fn open_initialized(path: &str, timeout: Duration) -> AppResult<Self> {
        let pool = Self::open(path, timeout)?;
        init_db(&pool.conn)?;
        Ok(pool)
    }

    /// Private in-memory database with the full schema (tests, dry runs).
    pub fn in_memory() -> AppResult<Self> {
        let pool = Self::configure(Connection::open_in_memory()?, DEFAULT_STORE_TIMEOUT)?;
        init_db(&pool.conn)?;
        Ok(pool)
    }

    fn configure(conn: Connection, timeout: Duration) -> AppResult<Self> {
        conn.busy_timeout(timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }
}
