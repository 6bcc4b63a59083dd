//! SQLite connection wrapper shared across async tasks.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use crate::errors::AppResult;

/// A single serialized connection. Writes are independent single-row inserts,
/// so one connection behind a mutex is enough; readers never observe a
/// partially written row.
pub struct DbPool {
    conn: Mutex<Connection>,
}

impl DbPool {
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the connection.
    /// A poisoned lock only means a previous statement panicked mid-call;
    /// the connection itself is still usable, so recover the guard.
    pub fn with_conn<F, T>(&self, func: F) -> T
    where
        F: FnOnce(&mut Connection) -> T,
    {
        let mut guard = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        func(&mut guard)
    }
}
